//! Reconciles stored options with the current default schema.

use tabula_model::{Column, PersistedColumn, PersistedOptions, TableOptions};

/// Overlay stored values on `defaults`.
///
/// Scalar fields take the stored value when one is present. View options
/// merge per key. Columns go through [`merge_columns`].
pub fn merge_options(
    defaults: TableOptions,
    persisted: Option<PersistedOptions>,
) -> TableOptions {
    let Some(persisted) = persisted else {
        return defaults;
    };

    let columns = match persisted.columns {
        Some(stored) => merge_columns(&defaults.columns, &stored),
        None => defaults.columns,
    };

    let mut view_options = defaults.view_options;
    if let Some(stored) = persisted.view_options {
        view_options.extend(stored);
    }

    TableOptions {
        page_size: persisted
            .page_size
            .filter(|size| *size > 0)
            .unwrap_or(defaults.page_size),
        selected_filter_key: persisted
            .selected_filter_key
            .unwrap_or(defaults.selected_filter_key),
        sort_key: persisted.sort_key.unwrap_or(defaults.sort_key),
        sort_direction: persisted
            .sort_direction
            .unwrap_or(defaults.sort_direction),
        secondary_sort_key: persisted
            .secondary_sort_key
            .or(defaults.secondary_sort_key),
        secondary_sort_direction: persisted
            .secondary_sort_direction
            .or(defaults.secondary_sort_direction),
        columns,
        view_options,
    }
}

/// Merge a stored column layout into the current schema.
///
/// Stored columns keep their order and visibility but take labels and
/// capabilities from the schema. Columns the schema no longer has are
/// dropped; schema columns missing from the stored layout are inserted at
/// their default index. An empty stored layout yields the defaults.
pub fn merge_columns(
    defaults: &[Column],
    persisted: &[PersistedColumn],
) -> Vec<Column> {
    if persisted.is_empty() {
        return defaults.to_vec();
    }

    let mut merged: Vec<Column> = Vec::with_capacity(defaults.len());
    for stored in persisted {
        if merged.iter().any(|existing| existing.name == stored.name) {
            continue;
        }
        if let Some(column) =
            defaults.iter().find(|column| column.name == stored.name)
        {
            merged.push(Column {
                is_visible: stored.is_visible,
                ..column.clone()
            });
        }
    }

    for (index, column) in defaults.iter().enumerate() {
        if merged.iter().any(|existing| existing.name == column.name) {
            continue;
        }
        let at = index.min(merged.len());
        merged.insert(at, column.clone());
    }

    merged
}
