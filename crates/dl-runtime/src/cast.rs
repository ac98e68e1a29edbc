use dl_core::{Speaker, VisualVariantRef};
use tracing::warn;

/// Read-only roster of speakers and their visual variants.
pub trait CastRegistry: Send + Sync {
    fn find_speaker(&self, name: &str) -> Option<&Speaker>;

    fn find_visual_variant(&self, speaker: &Speaker, variant_name: &str) -> Option<VisualVariantRef> {
        resolve_variant(speaker, variant_name)
    }
}

/// Exact name match first; otherwise the speaker's first variant, if any.
/// An empty variant name never resolves.
pub fn resolve_variant(speaker: &Speaker, variant_name: &str) -> Option<VisualVariantRef> {
    if variant_name.is_empty() {
        return None;
    }
    if let Some(variant) = speaker
        .variants
        .iter()
        .find(|variant| variant.name == variant_name)
    {
        return Some(VisualVariantRef::of(speaker, variant));
    }
    let fallback = speaker.variants.first()?;
    warn!(
        speaker = %speaker.name,
        requested = variant_name,
        fallback = %fallback.name,
        "visual variant not found, using first variant"
    );
    Some(VisualVariantRef::of(speaker, fallback))
}

#[derive(Debug, Default)]
pub struct EmptyCast;

impl CastRegistry for EmptyCast {
    fn find_speaker(&self, _name: &str) -> Option<&Speaker> {
        None
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCast {
    speakers: Vec<Speaker>,
}

impl InMemoryCast {
    pub fn new(speakers: Vec<Speaker>) -> Self {
        Self { speakers }
    }

    pub fn speakers(&self) -> &[Speaker] {
        &self.speakers
    }
}

impl FromIterator<Speaker> for InMemoryCast {
    fn from_iter<T: IntoIterator<Item = Speaker>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl CastRegistry for InMemoryCast {
    fn find_speaker(&self, name: &str) -> Option<&Speaker> {
        if name.is_empty() {
            return None;
        }
        self.speakers.iter().find(|speaker| speaker.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cast() -> InMemoryCast {
        vec![
            Speaker::new("Aoi")
                .with_variant("default", "aoi/default.png")
                .with_variant("smile", "aoi/smile.png"),
            Speaker::new("Ren").without_portrait(),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn find_speaker_matches_exact_name_only() {
        let cast = cast();
        assert!(cast.find_speaker("Aoi").is_some());
        assert!(cast.find_speaker("aoi").is_none());
        assert!(cast.find_speaker("").is_none());
        assert!(EmptyCast.find_speaker("Aoi").is_none());
    }

    #[test]
    fn variant_lookup_prefers_exact_match() {
        let cast = cast();
        let aoi = cast.find_speaker("Aoi").expect("Aoi");
        let smile = cast.find_visual_variant(aoi, "smile").expect("smile");
        assert_eq!(smile.asset, "aoi/smile.png");
    }

    #[test]
    fn variant_lookup_falls_back_to_first_variant() {
        let cast = cast();
        let aoi = cast.find_speaker("Aoi").expect("Aoi");
        let fallback = cast.find_visual_variant(aoi, "angry").expect("fallback");
        assert_eq!(fallback.variant, "default");
        assert!(cast.find_visual_variant(aoi, "").is_none());
    }

    #[test]
    fn variant_lookup_misses_when_speaker_has_no_variants() {
        let cast = cast();
        let ren = cast.find_speaker("Ren").expect("Ren");
        assert!(!ren.has_portrait);
        assert!(cast.find_visual_variant(ren, "default").is_none());
    }
}
