//! Game session: the menu around at most one running world
//!
//! Showing the menu pauses the world, hiding it resumes. Starting a new game
//! throws the previous world away.

use super::player::Key;
use super::present::Presenter;
use super::scene::SceneDescription;
use super::world::World;
use crate::{Settings, WorldError};

#[derive(Debug)]
pub struct GameSession {
    settings: Settings,
    world: Option<World>,
    menu_visible: bool,
}

impl GameSession {
    /// A fresh session starts on the menu with no world
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            world: None,
            menu_visible: true,
        }
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn is_menu_visible(&self) -> bool {
        self.menu_visible
    }

    pub fn can_continue(&self) -> bool {
        self.world.is_some()
    }

    /// Replace any current world with one built from `scene` and start it
    pub fn new_game(&mut self, scene: &SceneDescription) -> Result<(), WorldError> {
        self.destroy_scene();
        let world = World::new(scene, &self.settings)?;
        world.start()?;
        self.world = Some(world);
        self.menu_visible = false;
        log::info!("New game started");
        Ok(())
    }

    /// Hide the menu and resume the current world, if any
    pub fn continue_game(&mut self) -> Result<(), WorldError> {
        if !self.can_continue() {
            return Ok(());
        }
        self.set_menu_visible(false)
    }

    pub fn toggle_menu(&mut self) -> Result<(), WorldError> {
        self.set_menu_visible(!self.menu_visible)
    }

    fn set_menu_visible(&mut self, visible: bool) -> Result<(), WorldError> {
        if self.menu_visible == visible {
            return Ok(());
        }
        self.menu_visible = visible;
        if let Some(world) = &self.world {
            if visible {
                world.input().release_all();
                world.stop()?;
            } else {
                world.start()?;
            }
        }
        Ok(())
    }

    /// Dispose the current world, if any
    pub fn destroy_scene(&mut self) {
        if let Some(mut world) = self.world.take() {
            world.dispose();
        }
    }

    pub fn handle_key_down(&mut self, key: Key) -> Result<(), WorldError> {
        match key {
            Key::Escape => self.toggle_menu(),
            _ => {
                if let Some(world) = &self.world {
                    if !self.menu_visible {
                        world.input().key_down(key);
                    }
                }
                Ok(())
            }
        }
    }

    pub fn handle_key_up(&mut self, key: Key) {
        if let Some(world) = &self.world {
            world.input().key_up(key);
        }
    }

    /// Render pending frames of the current world
    pub fn present(&self, presenter: &mut impl Presenter) -> usize {
        self.world.as_ref().map_or(0, |w| w.present(presenter))
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        self.destroy_scene();
    }
}
