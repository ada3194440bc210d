use crate::hmo::{Hmo, MembershipTier};
use crate::user_info::{CleanedData, RawValue, UserField};

/// Rewrite English HMO and tier spellings into their Hebrew storage form.
///
/// Values that are already Hebrew, or that do not name a known HMO or tier,
/// are left as they are.
pub fn normalize_enums(data: &mut CleanedData) {
    if let Some(RawValue::Text(name)) = data.get_mut(&UserField::HmoName) {
        if let Some(hmo) = Hmo::parse(name) {
            *name = hmo.hebrew().to_string();
        }
    }
    if let Some(RawValue::Text(tier)) = data.get_mut(&UserField::MembershipTier) {
        if let Some(tier_value) = MembershipTier::parse(tier) {
            *tier = tier_value.hebrew().to_string();
        }
    }
}
