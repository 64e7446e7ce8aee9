use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::components::{
    InfoPanelText, MiniMapDot, MiniMapIndicator, MiniMapRoot, UiControl, ViewerButton, ZoomLevelText,
};
use crate::resources::constants::MINI_MAP_DOT_SIZE;
use crate::resources::{TerrainInfoState, ViewerConfig, ViewportState};
use crate::tile_system::lifecycle::TileLifecycle;
use crate::tile_system::loader::TileLoader;
use crate::tile_system::minimap::{MiniMapProjector, MiniMapState};
use crate::tile_system::types::ViewportCommand;

const PANEL_BACKGROUND: Color = Color::srgba(0.0, 0.0, 0.0, 0.5);
const BUTTON_BACKGROUND: Color = Color::srgba(0.15, 0.15, 0.2, 0.85);
const MINI_MAP_LOADED: Color = Color::srgb(0.45, 0.7, 0.35);
const MINI_MAP_PENDING: Color = Color::srgb(0.45, 0.45, 0.45);
const MINI_MAP_INDICATOR: Color = Color::srgb(1.0, 0.85, 0.2);

/// Sets up the UI elements
pub fn setup_ui(mut commands: Commands, config: Res<ViewerConfig>) {
    // Zoom level and tile counters
    commands.spawn((
        Text::new("Zoom: 1.00x"),
        TextFont { font_size: 16.0, ..default() },
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            bottom: Val::Px(10.0),
            ..default()
        },
        BackgroundColor(PANEL_BACKGROUND),
        ZoomLevelText,
    ));

    // Terrain info panel
    commands.spawn((
        Text::new("Click a tile to inspect it"),
        TextFont { font_size: 16.0, ..default() },
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0),
            max_width: Val::Px(320.0),
            padding: UiRect::all(Val::Px(6.0)),
            ..default()
        },
        BackgroundColor(PANEL_BACKGROUND),
        Interaction::default(),
        UiControl,
        InfoPanelText,
    ));

    // Button row
    let buttons = [
        ("+", ViewerButton::Command(ViewportCommand::ZoomIn)),
        ("-", ViewerButton::Command(ViewportCommand::ZoomOut)),
        ("Reset", ViewerButton::Command(ViewportCommand::Reset)),
        ("Grid", ViewerButton::Command(ViewportCommand::ToggleDebugGrid)),
        ("Map", ViewerButton::Command(ViewportCommand::ToggleMiniMap)),
        ("Redraw", ViewerButton::RedrawSelected),
    ];
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            right: Val::Px(10.0),
            bottom: Val::Px(10.0),
            column_gap: Val::Px(4.0),
            ..default()
        })
        .with_children(|row| {
            for (label, action) in buttons {
                row.spawn((
                    Button,
                    Node {
                        padding: UiRect::axes(Val::Px(10.0), Val::Px(4.0)),
                        ..default()
                    },
                    BackgroundColor(BUTTON_BACKGROUND),
                    UiControl,
                    action,
                ))
                .with_children(|button| {
                    button.spawn((Text::new(label), TextFont { font_size: 16.0, ..default() }));
                });
            }
        });

    // Mini-map frame; dots come from `update_mini_map_tiles`
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            right: Val::Px(10.0),
            top: Val::Px(10.0),
            width: Val::Px(config.mini_map_size),
            height: Val::Px(config.mini_map_size),
            overflow: Overflow::clip(),
            ..default()
        },
        BackgroundColor(PANEL_BACKGROUND),
        Interaction::default(),
        UiControl,
        MiniMapRoot,
    ))
    .with_children(|map| {
        // Positioned by `update_mini_map_indicator`; drawn above the dots
        map.spawn((
            Node {
                position_type: PositionType::Absolute,
                border: UiRect::all(Val::Px(1.0)),
                ..default()
            },
            BorderColor(MINI_MAP_INDICATOR),
            ZIndex(1),
            MiniMapIndicator,
        ));
    });
}

/// Updates the UI text to show the current zoom level and tile counts
pub fn update_zoom_level_text(
    viewport: Res<ViewportState>,
    lifecycle: Res<TileLifecycle>,
    loader: Res<TileLoader>,
    mut query: Query<&mut Text, With<ZoomLevelText>>,
) {
    if let Ok(mut text) = query.get_single_mut() {
        *text = Text::new(format!(
            "Zoom: {:.2}x (min {:.1}, max {:.1})\nTiles: {} loaded, {} downloading",
            viewport.zoom,
            viewport.min_zoom(),
            viewport.max_zoom(),
            lifecycle.len(),
            loader.pending_count(),
        ));
    }
}

/// Show the terrain panel state
pub fn update_info_panel(
    terrain: Res<TerrainInfoState>,
    mut query: Query<&mut Text, With<InfoPanelText>>,
) {
    if !terrain.is_changed() {
        return;
    }
    if let Ok(mut text) = query.get_single_mut() {
        *text = Text::new(terrain.panel.text());
    }
}

/// Rebuild the tile dots when the loaded set or the shown flag changes
pub fn update_mini_map_tiles(
    mut commands: Commands,
    state: Res<MiniMapState>,
    config: Res<ViewerConfig>,
    lifecycle: Res<TileLifecycle>,
    mut roots: Query<(Entity, &mut Node), With<MiniMapRoot>>,
    dots: Query<Entity, With<MiniMapDot>>,
) {
    if !state.is_changed() && !lifecycle.is_changed() {
        return;
    }
    let Ok((root, mut node)) = roots.get_single_mut() else {
        return;
    };

    node.display = if state.visible { Display::Flex } else { Display::None };
    for dot in dots.iter() {
        commands.entity(dot).despawn_recursive();
    }
    if !state.visible {
        return;
    }

    let projector = MiniMapProjector::new(&config);
    commands.entity(root).with_children(|map| {
        for (cell, tile) in lifecycle.iter_stacked() {
            let pos = projector.project_cell(cell) - Vec2::splat(MINI_MAP_DOT_SIZE / 2.0);
            let color = if tile.image.is_ready() { MINI_MAP_LOADED } else { MINI_MAP_PENDING };
            map.spawn((
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(pos.x),
                    top: Val::Px(pos.y),
                    width: Val::Px(MINI_MAP_DOT_SIZE),
                    height: Val::Px(MINI_MAP_DOT_SIZE),
                    ..default()
                },
                BackgroundColor(color),
                MiniMapDot,
            ));
        }
    });
}

/// Move the viewport indicator when the view or the window changes
pub fn update_mini_map_indicator(
    state: Res<MiniMapState>,
    config: Res<ViewerConfig>,
    viewport: Res<ViewportState>,
    windows: Query<Ref<Window>, With<PrimaryWindow>>,
    mut indicators: Query<&mut Node, With<MiniMapIndicator>>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    if !state.visible || !(viewport.is_changed() || state.is_changed() || window.is_changed()) {
        return;
    }
    let Ok(mut node) = indicators.get_single_mut() else {
        return;
    };

    let indicator = MiniMapProjector::new(&config).viewport_indicator(&viewport, window.size());
    node.left = Val::Px(indicator.min.x);
    node.top = Val::Px(indicator.min.y);
    node.width = Val::Px(indicator.width());
    node.height = Val::Px(indicator.height());
}
