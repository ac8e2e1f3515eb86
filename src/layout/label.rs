/// Render a cell label from a template.
///
/// Recognised placeholders: `{layer}`, `{row}`, `{col}`, `{index}`. Anything
/// else is copied through untouched.
pub fn render_label(schema: &str, layer: usize, row: u32, col: u32, global_index: u32) -> String {
    schema
        .replace("{layer}", &layer.to_string())
        .replace("{row}", &row.to_string())
        .replace("{col}", &col.to_string())
        .replace("{index}", &global_index.to_string())
}
