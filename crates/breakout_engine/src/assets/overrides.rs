//! Per-instance overrides applied on top of a loaded archetype
//!
//! Used by named child references and by level entries. An override body
//! looks like an archetype definition where every field is optional:
//! `components` entries are keyed `"<Type>_<n>"` and patch the n-th component
//! carrying that tag, `children` entries are keyed `"<Name>_<n>"` and recurse
//! into the n-th child named `<Name>`.

use serde_json::{Map, Value};

use super::archetype::{read_vec2, Archetype, RESERVED_FIELDS};
use super::{single_entry, LoadError};
use crate::ecs::component::split_indexed_name;
use crate::ecs::registry::ComponentRegistry;

pub(crate) fn apply_overrides(
    registry: &ComponentRegistry,
    archetype: &mut Archetype,
    body: &Map<String, Value>,
) -> Result<(), LoadError> {
    let name = archetype.name().to_string();

    if let Some(velocity) = body.get("velocity") {
        archetype.set_velocity(read_vec2(velocity, &name, "velocity")?);
    }
    if let Some(direction) = body.get("direction") {
        archetype.set_direction(read_vec2(direction, &name, "direction")?);
    }

    for (field, value) in body {
        if !RESERVED_FIELDS.contains(&field.as_str()) {
            archetype.properties_mut().set(field.clone(), value.clone());
        }
    }

    if let Some(components) = body.get("components") {
        let entries = components
            .as_array()
            .ok_or_else(|| LoadError::malformed(format!("overrides for `{name}`: `components` must be an array")))?;
        for (index, entry) in entries.iter().enumerate() {
            override_component(registry, archetype, index, entry)?;
        }
    }

    if let Some(children) = body.get("children") {
        let entries = children
            .as_array()
            .ok_or_else(|| LoadError::malformed(format!("overrides for `{name}`: `children` must be an array")))?;
        for (index, entry) in entries.iter().enumerate() {
            let what = format!("overrides for `{name}` child #{index}");
            let (key, child_body) = single_entry(entry, &what)?;
            let (child_name, nth) = split_indexed_name(key).unwrap_or((key, 0));
            let child_body = child_body
                .as_object()
                .ok_or_else(|| LoadError::malformed(format!("{what} must be an object")))?;

            let child = archetype
                .children_mut()
                .iter_mut()
                .filter(|child| child.name() == child_name)
                .nth(nth as usize)
                .ok_or_else(|| LoadError::OverrideTargetMissing(format!("{name}.{child_name}_{nth}")))?;
            apply_overrides(registry, child, child_body)?;
        }
    }

    Ok(())
}

fn override_component(
    registry: &ComponentRegistry,
    archetype: &mut Archetype,
    index: usize,
    entry: &Value,
) -> Result<(), LoadError> {
    let name = archetype.name().to_string();
    let (key, patch) = single_entry(entry, &format!("overrides for `{name}` component #{index}"))?;
    let (tag, nth) = split_indexed_name(key).unwrap_or((key, 0));

    let (target, current) = archetype
        .components()
        .with_tag(tag)
        .nth(nth as usize)
        .map(|(key, component)| (key.clone(), component.to_attributes()))
        .ok_or_else(|| LoadError::OverrideTargetMissing(format!("{name}.{tag}_{nth}")))?;

    let mut merged = Value::Object(current);
    merge_values(&mut merged, patch);

    let component = registry
        .decode(tag, &merged)
        .map_err(|source| LoadError::ComponentDecode {
            archetype: name.clone(),
            index,
            source,
        })?;
    archetype.components_mut().replace(&target, component);
    Ok(())
}

/// Recursively overlay `patch` onto `base`; non-object values replace
fn merge_values(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, patch) => *base = patch.clone(),
    }
}
