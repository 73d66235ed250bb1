//! Lint diagnostics for board params.
//!
//! Reports referential and geometric inconsistencies without modifying the
//! params. Run at save time; `prune_orphaned_animations` is the one repair.

use crate::id::SubContentId;
use crate::model::BoardParams;
use std::collections::HashSet;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Should be fixed. Usually a synchronization bug.
    Warning,
    /// Informational. Normalized on the next update.
    Info,
}

/// What a diagnostic points at, by array position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintTarget {
    Element(usize),
    Animation(usize),
}

/// A single lint diagnostic.
#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    pub target: LintTarget,
    /// Human-readable message.
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "orphaned-animation").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the params and return diagnostics.
#[must_use]
pub fn lint_params(params: &BoardParams) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_element_ids(params, &mut diags);
    lint_orphaned_animations(params, &mut diags);
    lint_geometry_bounds(params, &mut diags);
    diags
}

/// Remove every animation whose target element does not exist.
///
/// Returns the number of animations dropped.
pub fn prune_orphaned_animations(params: &mut BoardParams) -> usize {
    let known = element_ids(params);
    let before = params.animations.len();
    params.animations.retain(|anim| match anim.sub_content_id {
        Some(id) if known.contains(&id) => true,
        target => {
            log::warn!("dropping orphaned animation targeting {target:?}");
            false
        }
    });
    before - params.animations.len()
}

fn element_ids(params: &BoardParams) -> HashSet<SubContentId> {
    params
        .elements
        .iter()
        .filter_map(|e| e.sub_content_id())
        .collect()
}

// ─── Rules ────────────────────────────────────────────────────────────────

/// Warn on elements without an id, or sharing one with an earlier element.
fn lint_element_ids(params: &BoardParams, diags: &mut Vec<LintDiagnostic>) {
    let mut seen = HashSet::new();
    for (index, element) in params.elements.iter().enumerate() {
        match element.sub_content_id() {
            None => diags.push(LintDiagnostic {
                target: LintTarget::Element(index),
                message: format!("Element {index} has no subContentId."),
                severity: LintSeverity::Warning,
                rule: "missing-sub-content-id",
            }),
            Some(id) if !seen.insert(id) => diags.push(LintDiagnostic {
                target: LintTarget::Element(index),
                message: format!("Element {index} reuses subContentId `{id}`."),
                severity: LintSeverity::Warning,
                rule: "duplicate-sub-content-id",
            }),
            Some(_) => {}
        }
    }
}

/// Warn on animations whose target element does not exist.
fn lint_orphaned_animations(params: &BoardParams, diags: &mut Vec<LintDiagnostic>) {
    let known = element_ids(params);
    for (index, anim) in params.animations.iter().enumerate() {
        let resolves = anim.sub_content_id.is_some_and(|id| known.contains(&id));
        if !resolves {
            let target = anim
                .sub_content_id
                .map_or_else(|| "nothing".to_string(), |id| format!("`{id}`"));
            diags.push(LintDiagnostic {
                target: LintTarget::Animation(index),
                message: format!("Animation {index} targets {target}, which is not on the board."),
                severity: LintSeverity::Warning,
                rule: "orphaned-animation",
            });
        }
    }
}

/// Info when persisted geometry lies outside the canvas.
fn lint_geometry_bounds(params: &BoardParams, diags: &mut Vec<LintDiagnostic>) {
    for (index, element) in params.elements.iter().enumerate() {
        if !element.geometry().is_within_bounds() {
            diags.push(LintDiagnostic {
                target: LintTarget::Element(index),
                message: format!("Element {index} extends beyond the canvas."),
                severity: LintSeverity::Info,
                rule: "geometry-out-of-bounds",
            });
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
