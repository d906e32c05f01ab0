/// The `n`th field, if the list is long enough.
pub fn nth(fields: &[String], n: usize) -> Option<&String> {
    fields.get(n)
}

/// The `n`th field, or the first one when the list is shorter.
pub fn nth_or_first(fields: &[String], n: usize) -> Option<&String> {
    fields.get(n).or_else(|| fields.first())
}
