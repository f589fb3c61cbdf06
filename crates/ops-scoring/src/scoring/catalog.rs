//! Default weight tables seeded at startup.

use super::criterion::Criterion;

pub const RECOVERY_OPTIONS_RANKING: &str = "recoveryOptionsRanking";
pub const AIRCRAFT_SELECTION: &str = "aircraftSelectionCriteria";
pub const CREW_ASSIGNMENT: &str = "crewAssignmentCriteria";
pub const PASSENGER_PRIORITIZATION: &str = "passengerPrioritization";
pub const FLIGHT_PRIORITIZATION: &str = "flightPrioritization";
pub const FLIGHT_SCORING: &str = "flightScoring";
pub const PASSENGER_SCORING: &str = "passengerScoring";

/// Categories in the order the settings screens present them.
pub fn ordered_categories() -> [&'static str; 7] {
    [
        RECOVERY_OPTIONS_RANKING,
        AIRCRAFT_SELECTION,
        CREW_ASSIGNMENT,
        PASSENGER_PRIORITIZATION,
        FLIGHT_PRIORITIZATION,
        FLIGHT_SCORING,
        PASSENGER_SCORING,
    ]
}

pub(crate) fn standard_criteria(category: &str) -> Vec<Criterion> {
    let percentages: &[(&str, &str, f64)] = match category {
        RECOVERY_OPTIONS_RANKING => &[
            ("costWeight", "Cost Impact", 30.0),
            ("timeWeight", "Time to Recovery", 25.0),
            ("passengerImpactWeight", "Passenger Impact", 20.0),
            ("operationalComplexityWeight", "Operational Complexity", 15.0),
            ("reputationWeight", "Brand Reputation", 10.0),
        ],
        AIRCRAFT_SELECTION => &[
            ("maintenanceStatus", "Maintenance Status", 25.0),
            ("fuelEfficiency", "Fuel Efficiency", 20.0),
            ("routeSuitability", "Route Suitability", 20.0),
            ("passengerCapacity", "Passenger Capacity", 15.0),
            ("availabilityWindow", "Availability Window", 20.0),
        ],
        CREW_ASSIGNMENT => &[
            ("dutyTimeRemaining", "Duty Time Remaining", 30.0),
            ("qualifications", "Qualifications", 25.0),
            ("baseLocation", "Base Location", 20.0),
            ("restRequirements", "Rest Requirements", 15.0),
            ("languageSkills", "Language Skills", 10.0),
        ],
        PASSENGER_PRIORITIZATION => &[
            ("loyaltyTier", "Loyalty Tier", 25.0),
            ("ticketClass", "Ticket Class", 20.0),
            ("specialNeeds", "Special Needs", 30.0),
            ("groupSize", "Group Size", 15.0),
            ("connectionRisk", "Connection Risk", 10.0),
        ],
        FLIGHT_PRIORITIZATION => &[
            ("airlinePreference", "Airline Preference", 20.0),
            ("onTimePerformance", "On-Time Performance", 25.0),
            ("aircraftType", "Aircraft Type", 15.0),
            ("departureTime", "Departure Time", 20.0),
            ("connectionBuffer", "Connection Buffer", 20.0),
        ],
        PASSENGER_SCORING => &[
            ("vipWeight", "VIP Status", 40.0),
            ("loyaltyWeight", "Loyalty", 25.0),
            ("specialNeedsWeight", "Special Needs", 20.0),
            ("revenueWeight", "Revenue", 15.0),
        ],
        FLIGHT_SCORING => return flight_scoring(),
        _ => &[],
    };

    percentages
        .iter()
        .map(|(key, label, weight)| Criterion::new(*key, *label).with_default(*weight))
        .collect()
}

// Point-based bonuses on a one-point slider; the base score never drops below 50.
/// Flight-scoring bonuses top out well below the base score.
const BONUS_MAX_WEIGHT: f64 = 20.0;

fn flight_scoring() -> Vec<Criterion> {
    let bonuses = [
        ("priorityBonus", "Priority Bonus", 15.0),
        ("airlineBonus", "Airline Bonus", 10.0),
        ("specialReqBonus", "Special Requirements Bonus", 8.0),
        ("loyaltyBonus", "Loyalty Bonus", 8.0),
        ("groupBonus", "Group Bonus", 5.0),
    ];

    std::iter::once(
        Criterion::new("baseScore", "Base Score")
            .with_bounds(50.0, 100.0)
            .with_step(1.0)
            .with_default(70.0),
    )
    .chain(bonuses.into_iter().map(|(key, label, weight)| {
        Criterion::new(key, label)
            .with_bounds(0.0, BONUS_MAX_WEIGHT)
            .with_step(1.0)
            .with_default(weight)
    }))
    .collect()
}
