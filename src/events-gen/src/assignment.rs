use common::types::Variant;
use sha2::Digest;
use sha2::Sha256;

const BUCKETS: u64 = 10_000;

/// Sticky variant of a user within an experiment.
///
/// The variant depends only on the experiment id and the user id, so it can be
/// re-derived anywhere without stored state. Users are spread over
/// [`BUCKETS`] buckets by a SHA-256 of `"<experiment>:<user>"`; the first
/// `treatment_share` of the buckets are treatment.
pub fn variant(experiment_id: &str, user_id: &str, treatment_share: f64) -> Variant {
    let mut hasher = Sha256::new();
    hasher.update(experiment_id.as_bytes());
    hasher.update(b":");
    hasher.update(user_id.as_bytes());
    let digest = hasher.finalize();

    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    let bucket = u64::from_be_bytes(head) % BUCKETS;

    if (bucket as f64) < treatment_share * BUCKETS as f64 {
        Variant::Treatment
    } else {
        Variant::Control
    }
}
