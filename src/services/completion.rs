//! Completion scoring over a user-data snapshot.
//!
//! A pure function of (snapshot, destination config): identical input gives
//! bit-identical output, which is what lets independent screens show the same
//! progress bar without coordinating.

use std::collections::BTreeMap;

use crate::domain::models::{
    Category, CategoryCompletion, CompletionSnapshot, CompletionState, DestinationConfig,
    UserDataSnapshot,
};

/// Compute per-category and overall completion for one destination.
///
/// Field categories count non-empty trimmed values against the destination's
/// declared field list. The funds category counts items present against the
/// destination's minimum fund-item count rather than counting fields.
pub fn compute_completion(
    snapshot: &UserDataSnapshot,
    config: &DestinationConfig,
) -> CompletionSnapshot {
    let mut categories = BTreeMap::new();
    let mut sum_filled = 0usize;
    let mut sum_total = 0usize;

    for category in [Category::Passport, Category::PersonalInfo, Category::Funds, Category::Travel] {
        let completion = if category == Category::Funds {
            let total = config.min_fund_items;
            if total == 0 {
                continue;
            }
            let present = snapshot.funds.len();
            CategoryCompletion {
                // Clamped so a generous funder cannot push the overall
                // percent past what the other categories have earned.
                filled_count: present.min(total),
                total_count: total,
                state: CompletionState::classify(present, total),
                missing_fields: Vec::new(),
            }
        } else {
            let mut filled = 0usize;
            let mut total = 0usize;
            let mut missing = Vec::new();

            for descriptor in config.fields_in_category(category) {
                total += 1;
                let value = snapshot.field_value(&descriptor.key, &config.destination_id);
                if value.is_some_and(|v| !v.trim().is_empty()) {
                    filled += 1;
                } else {
                    missing.push(descriptor.key.clone());
                }
            }

            if total == 0 {
                continue;
            }

            CategoryCompletion {
                filled_count: filled,
                total_count: total,
                state: CompletionState::classify(filled, total),
                missing_fields: missing,
            }
        };

        sum_filled += completion.filled_count;
        sum_total += completion.total_count;
        categories.insert(category, completion);
    }

    let overall_percent = if sum_total == 0 {
        0
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        {
            (100.0 * sum_filled as f64 / sum_total as f64).round() as u8
        }
    };

    CompletionSnapshot {
        categories,
        overall_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{
        FieldDescriptor, FieldKey, FundItem, FundItemType, PersonalInfo, TravelInfo, UserId,
    };

    fn config() -> DestinationConfig {
        let field = |key: FieldKey, category: Category| FieldDescriptor {
            key,
            category,
            rules: Vec::new(),
        };
        DestinationConfig {
            destination_id: "thailand".to_string(),
            min_fund_items: 3,
            fields: vec![
                field(FieldKey::passport("passportNumber"), Category::Passport),
                field(FieldKey::passport("expiryDate"), Category::Passport),
                field(FieldKey::personal("occupation"), Category::PersonalInfo),
                field(FieldKey::personal("email"), Category::PersonalInfo),
                field(FieldKey::travel("arrivalDate"), Category::Travel),
            ],
        }
    }

    fn snapshot() -> UserDataSnapshot {
        let user = UserId::from("u1");
        let mut personal = PersonalInfo::new(user.clone());
        personal.occupation = Some("Engineer".to_string());
        personal.email = Some("   ".to_string()); // whitespace does not count

        let mut travel = TravelInfo::new(user.clone(), "thailand");
        travel.set_field("arrivalDate", "2026-12-01");

        UserDataSnapshot {
            passport: None,
            personal_info: Some(personal),
            funds: vec![FundItem::new(user.clone(), FundItemType::Cash)],
            travel: [("thailand".to_string(), travel)].into_iter().collect(),
        }
    }

    #[test]
    fn counts_and_states_per_category() {
        let result = compute_completion(&snapshot(), &config());

        let passport = &result.categories[&Category::Passport];
        assert_eq!(passport.filled_count, 0);
        assert_eq!(passport.state, CompletionState::Incomplete);
        assert_eq!(passport.missing_fields.len(), 2);

        let personal = &result.categories[&Category::PersonalInfo];
        assert_eq!(personal.filled_count, 1);
        assert_eq!(personal.state, CompletionState::Partial);
        assert_eq!(
            personal.missing_fields,
            vec![FieldKey::personal("email")]
        );

        let funds = &result.categories[&Category::Funds];
        assert_eq!(funds.filled_count, 1);
        assert_eq!(funds.total_count, 3);
        assert_eq!(funds.state, CompletionState::Partial);

        let travel = &result.categories[&Category::Travel];
        assert_eq!(travel.state, CompletionState::Complete);

        // 0+1+1+1 filled over 2+2+3+1 totals
        assert_eq!(result.overall_percent, 38);
    }

    #[test]
    fn fund_surplus_is_clamped_for_percent() {
        let mut snap = snapshot();
        let user = UserId::from("u1");
        for _ in 0..5 {
            snap.funds.push(FundItem::new(user.clone(), FundItemType::BankCard));
        }

        let result = compute_completion(&snap, &config());
        let funds = &result.categories[&Category::Funds];
        assert_eq!(funds.filled_count, 3);
        assert_eq!(funds.state, CompletionState::Complete);
    }

    #[test]
    fn deterministic_for_identical_input() {
        let snap = snapshot();
        let cfg = config();
        assert_eq!(compute_completion(&snap, &cfg), compute_completion(&snap, &cfg));
    }

    #[test]
    fn empty_config_scores_zero() {
        let cfg = DestinationConfig {
            destination_id: "nowhere".to_string(),
            fields: Vec::new(),
            min_fund_items: 0,
        };
        let result = compute_completion(&snapshot(), &cfg);
        assert_eq!(result.overall_percent, 0);
        assert!(result.categories.is_empty());
    }
}
