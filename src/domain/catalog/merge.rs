use crate::domain::llm::ModelDescriptor;

/// Static models first, then dynamic models whose names are not static.
pub fn merge_catalog(
    static_models: &[ModelDescriptor],
    dynamic_models: Vec<ModelDescriptor>,
) -> Vec<ModelDescriptor> {
    let mut merged = static_models.to_vec();

    for model in dynamic_models {
        if !merged.iter().any(|m| m.name() == model.name()) {
            merged.push(model);
        }
    }

    merged
}

/// Drop dynamic entries that collide with a static name (exact match)
pub fn exclude_static(
    static_models: &[ModelDescriptor],
    dynamic_models: Vec<ModelDescriptor>,
) -> Vec<ModelDescriptor> {
    dynamic_models
        .into_iter()
        .filter(|model| !static_models.iter().any(|s| s.name() == model.name()))
        .collect()
}
