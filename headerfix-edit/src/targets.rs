//! Default target list.

use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashSet;

/// Plugin headers known to carry modular Firebase imports, relative to the
/// pub cache root.
pub const PUB_CACHE_TARGETS: &[&str] = &[
    "hosted/pub.dev/firebase_storage-11.6.5/ios/Classes/FLTTaskStateChannelStreamHandler.h",
    "hosted/pub.dev/firebase_auth-4.16.0/ios/Classes/Private/FLTAuthStateChannelStreamHandler.h",
    "hosted/pub.dev/firebase_auth-4.16.0/ios/Classes/Private/PigeonParser.h",
    "hosted/pub.dev/firebase_auth-4.16.0/ios/Classes/Private/FLTIdTokenChannelStreamHandler.h",
    "hosted/pub.dev/firebase_auth-4.16.0/ios/Classes/Private/FLTPhoneNumberVerificationStreamHandler.h",
    "hosted/pub.dev/firebase_auth-4.16.0/ios/Classes/Public/FLTFirebaseAuthPlugin.h",
];

pub fn default_targets(pub_cache: &Utf8Path) -> Vec<Utf8PathBuf> {
    PUB_CACHE_TARGETS
        .iter()
        .map(|rel| pub_cache.join(rel))
        .collect()
}

/// Drop repeated paths, keeping the first occurrence in place.
pub fn dedup_targets(targets: Vec<Utf8PathBuf>) -> Vec<Utf8PathBuf> {
    let mut seen = HashSet::new();
    targets
        .into_iter()
        .filter(|p| seen.insert(p.clone()))
        .collect()
}
