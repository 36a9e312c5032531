//! Access Evaluator: pure decision over pricing, payment, and subscription
//! facts. Gates non-preview content delivery and decides whether enrolling
//! requires a payment step. No side effects.

use chrono::{DateTime, Utc};

use crate::auth::{SubscriptionInfo, SubscriptionTier};
use crate::courses::types::PricingType;
use crate::courses::Course;

/// Facts gathered by the engine before the decision is made.
#[derive(Debug, Clone, Copy)]
pub struct AccessFacts {
    pub has_completed_payment: bool,
}

pub fn required_tier(course: &Course) -> Option<SubscriptionTier> {
    course
        .premium_tier
        .as_deref()
        .map(SubscriptionTier::from)
}

/// Core access rule:
/// - free course: always accessible
/// - paid course: accessible iff a completed payment exists
/// - premium course: accessible with an active qualifying subscription,
///   or via a completed one-off purchase of this course
pub fn evaluate(
    course: &Course,
    facts: AccessFacts,
    subscription: Option<&SubscriptionInfo>,
    now: DateTime<Utc>,
) -> bool {
    match course.pricing() {
        PricingType::Free => true,
        PricingType::Paid => facts.has_completed_payment,
        PricingType::Premium => {
            let subscription_ok = subscription
                .map(|sub| {
                    sub.is_active_at(now)
                        && match required_tier(course) {
                            Some(SubscriptionTier::Premium) => {
                                sub.tier == SubscriptionTier::Premium
                            }
                            _ => true,
                        }
                })
                .unwrap_or(false);
            subscription_ok || facts.has_completed_payment
        }
    }
}
