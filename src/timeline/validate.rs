use crate::{
    foundation::error::{ReelError, ReelResult},
    timeline::model::{Element, ElementKind, Track, TrackKind},
};

/// Outcome of checking whether an element may live on a track.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Compatibility {
    Valid,
    Invalid(String),
}

impl Compatibility {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid(msg) => Some(msg),
        }
    }

    pub fn into_result(self) -> ReelResult<()> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(msg) => Err(ReelError::Validation(msg)),
        }
    }
}

/// Text elements go on text tracks; video, image and audio go on media or audio tracks.
pub fn validate_element_track_compatibility(element: &Element, track: &Track) -> Compatibility {
    let is_text_track = track.kind == TrackKind::Text;
    if element.kind.is_text() && !is_text_track {
        return Compatibility::Invalid("text elements can only be placed on text tracks".to_owned());
    }
    if element.kind.is_media_kind() && is_text_track {
        return Compatibility::Invalid(
            "media elements can only be placed on media or audio tracks".to_owned(),
        );
    }
    Compatibility::Valid
}

/// Timing fields must be finite and non-negative, with a non-negative effective duration.
pub fn validate_element_timing(element: &Element) -> ReelResult<()> {
    let fields = [
        ("duration", element.duration),
        ("start_time", element.start_time),
        ("trim_start", element.trim_start),
        ("trim_end", element.trim_end),
    ];
    for (name, value) in fields {
        if !value.is_finite() || value < 0.0 {
            return Err(ReelError::validation(format!(
                "element '{}' has invalid {name} {value}",
                element.id
            )));
        }
    }
    if element.effective_duration() < 0.0 {
        return Err(ReelError::validation(format!(
            "element '{}' is trimmed past its duration",
            element.id
        )));
    }
    Ok(())
}

/// Required fields per element kind: media-kind elements reference an asset, text is non-empty.
pub fn validate_required_fields(element: &Element) -> ReelResult<()> {
    match &element.kind {
        ElementKind::Text(text) if text.content.trim().is_empty() => {
            Err(ReelError::validation("text element must have content"))
        }
        ElementKind::Text(_) => Ok(()),
        kind if kind.media_id().is_some_and(str::is_empty) => Err(ReelError::validation(format!(
            "{} element must reference a media asset",
            kind.type_name()
        ))),
        _ => Ok(()),
    }
}

/// Structural check of a whole track list, used when loading persisted timelines.
pub fn validate_track_list(tracks: &[Track]) -> ReelResult<()> {
    let mut mains = tracks.iter().filter(|t| t.is_main);
    if let Some(main) = mains.next() {
        if main.kind != TrackKind::Media {
            return Err(ReelError::validation(format!(
                "main track '{}' must be a media track",
                main.id
            )));
        }
        if mains.next().is_some() {
            return Err(ReelError::validation("at most one track may be the main track"));
        }
    }
    for track in tracks {
        for element in &track.elements {
            validate_element_track_compatibility(element, track).into_result()?;
            validate_element_timing(element)?;
        }
    }
    Ok(())
}

/// Whether `[start, end)` would collide with any element on `track` other than `exclude_id`.
pub fn would_element_overlap(track: &Track, start: f64, end: f64, exclude_id: Option<&str>) -> bool {
    track.elements.iter().any(|e| {
        if exclude_id == Some(e.id.as_str()) {
            return false;
        }
        start < e.end_time() && end > e.start_time
    })
}

/// Pairs of element ids on `track` whose intervals overlap.
pub fn check_element_overlaps(track: &Track) -> Vec<(String, String)> {
    let mut sorted: Vec<&Element> = track.elements.iter().collect();
    sorted.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    let mut overlaps = Vec::new();
    for (i, a) in sorted.iter().enumerate() {
        for b in &sorted[i + 1..] {
            if b.start_time >= a.end_time() {
                break;
            }
            overlaps.push((a.id.clone(), b.id.clone()));
        }
    }
    overlaps
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/validate.rs"]
mod tests;
