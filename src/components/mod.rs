mod tile;

pub use tile::*;

use bevy::prelude::*;
use crate::tile_system::types::ViewportCommand;

/// Marker component for the UI text that displays the current zoom level
#[derive(Component)]
pub struct ZoomLevelText;

/// Marker for the terrain info panel text
#[derive(Component)]
pub struct InfoPanelText;

/// Container the mini-map is drawn into
#[derive(Component)]
pub struct MiniMapRoot;

/// One loaded tile on the mini-map
#[derive(Component)]
pub struct MiniMapDot;

/// Outline of the area the window shows
#[derive(Component)]
pub struct MiniMapIndicator;

/// UI region that swallows pointer presses, so pressing it never starts a map drag
#[derive(Component)]
pub struct UiControl;

/// What an on-screen button does when pressed
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub enum ViewerButton {
    Command(ViewportCommand),
    RedrawSelected,
}
