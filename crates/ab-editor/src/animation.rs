//! Animation model: binds an effect to its target item.

use crate::dictionary::Dictionary;
use crate::host::SubForm;
use ab_core::id::AnimationId;
use ab_core::model::AnimationParams;

/// Separator between the parts of an animation summary.
pub const DETAILS_SEPARATOR: &str = " \u{00b7} ";

pub struct Animation {
    id: AnimationId,
    form: Option<Box<dyn SubForm>>,
}

impl std::fmt::Debug for Animation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animation")
            .field("id", &self.id)
            .field("has_form", &self.form.is_some())
            .finish()
    }
}

impl Animation {
    /// A model with a freshly generated id.
    pub fn new() -> Self {
        Self::with_id(AnimationId::generate())
    }

    pub fn with_id(id: AnimationId) -> Self {
        Self { id, form: None }
    }

    pub fn id(&self) -> AnimationId {
        self.id
    }

    pub fn form_mut(&mut self) -> Option<&mut (dyn SubForm + 'static)> {
        self.form.as_deref_mut()
    }

    pub fn set_form(&mut self, form: Box<dyn SubForm>) {
        self.form = Some(form);
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary shown under the animation's title: `effect · start · 1.5s`.
pub fn animation_details(params: &AnimationParams, dictionary: &Dictionary) -> String {
    let effect = params.effect.as_deref().unwrap_or_default();
    let start_with = params.start_with.as_deref().unwrap_or_default();
    let duration = params
        .duration
        .map_or_else(|| "-".to_string(), |d| d.to_string());

    [
        dictionary.get(&format!("l10n.animation.{effect}")),
        dictionary.get(&format!("l10n.animation.{start_with}")),
        format!("{duration}s"),
    ]
    .join(DETAILS_SEPARATOR)
}
