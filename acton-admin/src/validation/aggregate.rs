//! Rule aggregation over a field tree
//!
//! Walks fields depth-first and returns borrowed rules in the order the
//! validator must check them. Per field: `rules`, then the mode's rule set,
//! then the rules of every active branch in attach order. Branch bodies are
//! only entered when their condition holds, so nested branches under an
//! inactive one are never evaluated.

use super::{Mode, ValidationContext};
use crate::fields::Field;
use crate::rules::Rule;
use crate::when::is_active;

/// Collect the rules that apply to `fields` for `mode`
///
/// Importing uses the creation rules.
#[must_use]
pub fn collect_rules<'a>(fields: &'a [Field], ctx: &ValidationContext, mode: Mode) -> Vec<&'a Rule> {
    let mut rules = Vec::new();
    collect_into(fields, ctx, Some(mode), &mut rules);
    rules
}

/// Collect rules for the mode inferred from the context's path
///
/// Without a recognisable mode only the unconditional `rules` (and those of
/// active branches) are collected.
#[must_use]
pub fn collect_rules_for_context<'a>(fields: &'a [Field], ctx: &ValidationContext) -> Vec<&'a Rule> {
    let mut rules = Vec::new();
    collect_into(fields, ctx, ctx.mode(), &mut rules);
    rules
}

fn collect_into<'a>(
    fields: &'a [Field],
    ctx: &ValidationContext,
    mode: Option<Mode>,
    out: &mut Vec<&'a Rule>,
) {
    for field in fields {
        out.extend(field.rules.iter());
        match mode {
            Some(mode) if mode.uses_creation_rules() => out.extend(field.creation_rules.iter()),
            Some(Mode::Editing) => out.extend(field.update_rules.iter()),
            _ => {}
        }

        for item in field.when.items() {
            if is_active(item, ctx) {
                tracing::trace!(
                    field = %field.name,
                    condition = %item.condition_name,
                    operator = %item.operator,
                    "when branch active"
                );
                collect_into(&item.body, ctx, mode, out);
            }
        }
    }
}
