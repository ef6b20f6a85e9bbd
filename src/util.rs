use chrono::Local;

/// Today's date as the workflow stamps it onto submissions and notes.
pub fn formatted_date() -> String {
    Local::now().format("%m/%d/%Y").to_string()
}

/// Split a `field=value` assignment, trimming the field name.
pub fn parse_assignment(raw: &str) -> Option<(String, String)> {
    let (field, value) = raw.split_once('=')?;
    let field = field.trim();
    if field.is_empty() {
        return None;
    }
    Some((field.to_string(), value.to_string()))
}
