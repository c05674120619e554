//! Derived updates triggered by panel edits
//!
//! Some light parameters change the shape of the light's helper. An edit to
//! one of those through the panel re-derives the helper right away; an edit
//! to anything else leaves the helper as it is.

use crate::foundation::collections::BindingId;
use crate::panel::binding::FieldRef;
use crate::panel::fields::NumericField;
use crate::panel::DebugPanel;
use crate::render::lighting::LightKind;
use crate::scene::SceneGraph;

/// Follow-up action run after a field is edited through the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedEffect {
    /// Re-derive the helper geometry of the edited light
    RefreshHelper,
}

/// Field edits that need a follow-up action
pub const DERIVED_EFFECTS: &[(LightKind, NumericField, DerivedEffect)] = &[
    (LightKind::Spot, NumericField::Distance, DerivedEffect::RefreshHelper),
    (LightKind::Spot, NumericField::Angle, DerivedEffect::RefreshHelper),
];

/// Follow-up action for editing `field` on a light of `kind`
pub fn effect_for(kind: LightKind, field: NumericField) -> Option<DerivedEffect> {
    DERIVED_EFFECTS
        .iter()
        .find(|(k, f, _)| *k == kind && *f == field)
        .map(|(_, _, effect)| *effect)
}

/// Attach follow-up hooks to every panel control that needs one
///
/// Returns how many hooks were attached.
pub fn wire_derived_effects(panel: &mut DebugPanel, scene: &SceneGraph) -> usize {
    let targets: Vec<(BindingId, DerivedEffect)> = panel
        .bindings()
        .filter_map(|(id, binding)| {
            let FieldRef::Numeric(field) = binding.field else {
                return None;
            };
            let light = scene.light(binding.owner)?;
            effect_for(light.kind(), field).map(|effect| (id, effect))
        })
        .collect();

    let mut wired = 0;
    for (id, effect) in targets {
        let Ok(binding) = panel.binding(id) else {
            continue;
        };
        let light_key = binding.owner;
        let label = binding.label.clone();
        let hooked = match effect {
            DerivedEffect::RefreshHelper => panel.on_change(
                id,
                Box::new(move |scene: &mut SceneGraph, _| {
                    if !scene.refresh_helper(light_key) {
                        log::warn!("Control '{label}' edited a light without a helper");
                    }
                }),
            ),
        };
        if hooked.is_ok() {
            wired += 1;
        }
    }
    log::debug!("Wired {wired} derived panel effects");
    wired
}
