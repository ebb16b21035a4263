//! Bench plugin wiring (glue).
//! - Config + live geometry settings
//! - Shape / material lists
//! - Generate, material-select and parameter-set events

use bevy::prelude::*;

use super::session::{
    handle_generate_requests, handle_material_selection, handle_parameter_edits, init_session,
    sync_active_parameters, CreatedInfo, GenerateRequest, SelectMaterial, SetParameter,
};
use super::settings::{BenchSettings, GeometrySettings};

pub struct BenchPlugin;
impl Plugin for BenchPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BenchSettings>()
            .init_resource::<GeometrySettings>()
            .init_resource::<CreatedInfo>()
            .add_event::<GenerateRequest>()
            .add_event::<SelectMaterial>()
            .add_event::<SetParameter>()
            .add_systems(Startup, init_session)
            // Material first so a same-frame generate picks up the new selection.
            .add_systems(
                Update,
                (
                    handle_material_selection,
                    handle_parameter_edits.after(handle_material_selection),
                    handle_generate_requests.after(handle_material_selection),
                    sync_active_parameters.after(handle_parameter_edits),
                ),
            );
    }
}
