//! Declarative tables linking resource attributes to request payload fields.
//!
//! Each resource keeps one `static` slice of [`FieldMapping`]s. The create path runs every
//! `create` setter; the update path runs the `update` setter only for attributes that
//! changed, which is what keeps update payloads sparse.

use crate::resource_data::ResourceData;
use crate::schema::ResourceSchema;

/// Copies one attribute from a typed config `C` into a create payload `P` or an update
/// payload `U`.
///
/// Attributes GitLab only accepts at creation time have no `update` setter.
pub struct FieldMapping<C, P, U> {
    pub name: &'static str,
    pub create: fn(&C, &mut P),
    pub update: Option<fn(&C, &mut U)>,
}

/// Fills a create payload from every mapping.
///
/// Setters copy `Option` fields as they are, so attributes absent from the configuration
/// stay `None` and are left out of the request.
pub fn apply_create<C, P, U>(fields: &[FieldMapping<C, P, U>], config: &C, payload: &mut P) {
    for field in fields {
        (field.create)(config, payload);
    }
}

/// Fills an update payload with the attributes that changed and returns their names.
pub fn apply_changes<C, P, U>(
    fields: &[FieldMapping<C, P, U>],
    schema: &ResourceSchema,
    data: &ResourceData,
    config: &C,
    payload: &mut U,
) -> Vec<&'static str> {
    let mut changed = Vec::new();
    for field in fields {
        let Some(update) = field.update else {
            continue;
        };
        let Some(attribute) = schema.attribute(field.name) else {
            continue;
        };
        if data.has_change(attribute) {
            update(config, payload);
            changed.push(field.name);
        }
    }
    changed
}
