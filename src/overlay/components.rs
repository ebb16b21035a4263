use bevy::prelude::*;

/// What a panel button does when pressed.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub enum BenchButton {
    TogglePanel,
    ScaleResolution(f32),
    FrameLimit(Option<u32>),
    ToggleStaticBatching,
    ToggleCombineMeshes,
    Generate(usize),
    SelectMaterial(usize),
}

/// Text whose content is re-derived from resources every frame.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DynamicText {
    Resolution,
    FrameLimit,
    Spacing,
    CreatedInfo,
    ActiveMaterial,
}

#[derive(Component)]
pub struct FpsLabel;

#[derive(Component)]
pub struct LogBanner;

#[derive(Component)]
pub struct LogBannerText;

/// The scrollable tools panel.
#[derive(Component)]
pub struct ToolsPanel;

/// Text on the `>` / `<` side button.
#[derive(Component)]
pub struct PanelToggleText;

/// Container the active material's parameter rows are spawned into.
#[derive(Component)]
pub struct ParameterList;

/// Value label of slider parameter row `0`.
#[derive(Component)]
pub struct ParameterValue(pub usize);
