/// Turns a dataset class identifier such as `Corn_(maize)___Common_rust_`
/// into the text shown to users: `Corn maize - Common rust`.
pub fn display_name(label: &str) -> String {
    let spaced = label
        .replace("___", " - ")
        .replace(['_', '(', ')', ','], " ");
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}
