use crate::variant::VariantSite;

/// Accessors a read must expose to be featurized against a site.
///
/// Coordinates are 0-based and must share the frame of the `VariantSite`.
pub trait Evidence {
    fn name(&self) -> &str;

    fn mapping_quality(&self) -> u8;

    /// Base quality of the read base aligned to the site start, if any.
    fn base_quality_at(&self, site: &VariantSite) -> Option<u8>;

    fn is_first_of_pair(&self) -> bool;

    fn is_reverse(&self) -> bool;

    /// Number of bases in the read sequence, soft clips included.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Alignment start extended over leading clips.
    fn unclipped_start(&self) -> i64;

    /// Start of the mate alignment, or -1 if unset.
    fn mate_start(&self) -> i64;

    /// Signed template length.
    fn fragment_length(&self) -> i64;

    /// Offset of the site start within the read sequence, if the read covers it.
    fn read_position_at(&self, site: &VariantSite) -> Option<usize>;
}
