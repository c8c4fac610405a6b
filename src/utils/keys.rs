//! Well-known cache keys.

/// Prefix shared by every per-user plan list.
pub const USER_PLANS_PREFIX: &str = "user_plans_";

pub fn user_profile(user_id: &str) -> String {
    format!("user_profile_{}", user_id)
}

pub fn user_plans(user_id: &str) -> String {
    format!("{}{}", USER_PLANS_PREFIX, user_id)
}

pub fn user_wishes(user_id: &str) -> String {
    format!("user_wishes_{}", user_id)
}

pub fn plan_details(plan_id: &str) -> String {
    format!("plan_details_{}", plan_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_shapes() {
        assert_eq!(user_profile("7"), "user_profile_7");
        assert_eq!(user_plans("7"), "user_plans_7");
        assert_eq!(user_wishes("7"), "user_wishes_7");
        assert_eq!(plan_details("9"), "plan_details_9");
        assert!(user_plans("7").starts_with(USER_PLANS_PREFIX));
    }
}
