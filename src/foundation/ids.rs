/// Fresh random identifier for tracks, elements and media assets.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/ids.rs"]
mod tests;
