// ── Persisted preference seam ──

/// Preference key for discrepancy-column visibility.
pub const DISCREPANCY_VISIBLE_KEY: &str = "hasSwtStoreSetting";

/// Read access to persisted user preferences.
pub trait PreferenceStore {
    fn get_item(&self, key: &str) -> Option<String>;
}

/// Whether the discrepancy column should be shown. Only the stored value
/// `"1"` enables it.
pub fn discrepancy_visible(store: &(impl PreferenceStore + ?Sized)) -> bool {
    store.get_item(DISCREPANCY_VISIBLE_KEY).as_deref() == Some("1")
}
