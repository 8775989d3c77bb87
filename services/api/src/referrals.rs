use serde::Serialize;
use tb_screening::screening::{RiskLevel, ScoreReason, ScoringResult, Urgency};

/// A TB testing or treatment center the result screen can point at.
#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct ReferralCenter {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub phone: &'static str,
    pub address: &'static str,
    pub lat: f64,
    pub lng: f64,
}

/// Center plus the distance from the caller, when a location was given.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ReferralView {
    #[serde(flatten)]
    pub center: ReferralCenter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

pub(crate) fn directory() -> &'static [ReferralCenter] {
    &[
        ReferralCenter {
            id: "1",
            name: "District TB Center - Central Mumbai",
            category: "DOTS center",
            phone: "+91 98765 43210",
            address: "123 Medical Complex, Central District, Mumbai, Maharashtra 400001",
            lat: 19.0760,
            lng: 72.8777,
        },
        ReferralCenter {
            id: "2",
            name: "Government General Hospital TB Wing",
            category: "Hospital",
            phone: "+91 98765 43211",
            address: "456 Hospital Road, Dadar, Mumbai, Maharashtra 400014",
            lat: 19.0176,
            lng: 72.8562,
        },
        ReferralCenter {
            id: "3",
            name: "City Diagnostic Lab - TB Testing",
            category: "Laboratory",
            phone: "+91 98765 43212",
            address: "789 Lab Street, Andheri, Mumbai, Maharashtra 400069",
            lat: 19.1136,
            lng: 72.8697,
        },
        ReferralCenter {
            id: "4",
            name: "Dr. Sharma's Pulmonary Clinic",
            category: "Specialist Clinic",
            phone: "+91 98765 43213",
            address: "321 Clinic Plaza, Bandra, Mumbai, Maharashtra 400050",
            lat: 19.0596,
            lng: 72.8295,
        },
        ReferralCenter {
            id: "5",
            name: "Metro Chest & TB Center",
            category: "Specialist Center",
            phone: "+91 98765 43214",
            address: "654 Metro Building, Powai, Mumbai, Maharashtra 400076",
            lat: 19.1197,
            lng: 72.9073,
        },
        ReferralCenter {
            id: "6",
            name: "Community Health Worker - Ravi Kumar",
            category: "Community Support",
            phone: "+91 98765 43215",
            address: "Local Community Center, Dharavi, Mumbai, Maharashtra 400017",
            lat: 19.0423,
            lng: 72.8570,
        },
        ReferralCenter {
            id: "7",
            name: "Apollo TB Diagnostic Center",
            category: "Private Hospital",
            phone: "+91 98765 43216",
            address: "Apollo Health City, Jubilee Hills, Hyderabad, Telangana 500033",
            lat: 17.4239,
            lng: 78.4738,
        },
        ReferralCenter {
            id: "8",
            name: "AIIMS TB & Chest Department",
            category: "Government Hospital",
            phone: "+91 98765 43217",
            address: "AIIMS Campus, Ansari Nagar, New Delhi 110029",
            lat: 28.5677,
            lng: 77.2100,
        },
    ]
}

/// Nearby centers sorted by distance, or the directory head when no
/// location was supplied. An urgent result floats treatment-capable
/// categories to the front.
pub(crate) fn recommended(
    location: Option<(f64, f64)>,
    radius_km: f64,
    max_results: usize,
    urgency: Option<Urgency>,
) -> Vec<ReferralView> {
    let mut views: Vec<ReferralView> = match location {
        Some((lat, lng)) => {
            let mut with_distance: Vec<ReferralView> = directory()
                .iter()
                .map(|center| ReferralView {
                    center: *center,
                    distance_km: Some(haversine_km(lat, lng, center.lat, center.lng)),
                })
                .filter(|view| view.distance_km.unwrap_or(f64::INFINITY) <= radius_km)
                .collect();
            with_distance.sort_by(|a, b| {
                a.distance_km
                    .partial_cmp(&b.distance_km)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            with_distance
        }
        None => directory()
            .iter()
            .map(|center| ReferralView {
                center: *center,
                distance_km: None,
            })
            .collect(),
    };

    if matches!(urgency, Some(Urgency::Immediate)) {
        views.sort_by_key(|view| !treats_active_tb(view.center.category));
    }

    views.truncate(max_results);
    views
}

fn treats_active_tb(category: &str) -> bool {
    matches!(
        category,
        "DOTS center" | "Hospital" | "Government Hospital" | "Private Hospital"
    )
}

fn haversine_km(a_lat: f64, a_lng: f64, b_lat: f64, b_lng: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let d_lat = (b_lat - a_lat).to_radians();
    let d_lng = (b_lng - a_lng).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + a_lat.to_radians().cos() * b_lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Plain-language narrative for the result screen, keyed off the
/// classification and score the core produced.
pub(crate) fn plain_explanation(result: &ScoringResult, cap: u8) -> String {
    let score = result.score;
    let mut explanation = match result.classification {
        RiskLevel::Confirmed => format!(
            "Based on your symptoms and risk factors (score: {score}/{cap}), there is a very \
             high likelihood of TB infection. Immediate medical evaluation and testing is \
             strongly recommended."
        ),
        RiskLevel::High => format!(
            "Your symptoms and risk assessment (score: {score}/{cap}) indicate high TB risk. \
             Please seek medical testing as soon as possible for proper evaluation."
        ),
        RiskLevel::Moderate => format!(
            "Your screening shows moderate TB risk (score: {score}/{cap}). Medical \
             consultation and testing is recommended to rule out TB infection."
        ),
        RiskLevel::Low => format!(
            "Your screening indicates low TB risk (score: {score}/{cap}). Continue monitoring \
             your health and seek care if symptoms develop or worsen."
        ),
    };

    let summaries: Vec<String> = result.reasons.iter().map(ScoreReason::summary).collect();
    if summaries.len() > 3 {
        explanation.push_str(&format!(
            " Key factors include: {} and {} other indicators.",
            summaries[..3].join(", "),
            summaries.len() - 3
        ));
    } else if !summaries.is_empty() {
        explanation.push_str(&format!(" Key factors: {}.", summaries.join(", ")));
    }

    explanation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearby_centers_are_sorted_by_distance() {
        // Central Mumbai as the caller location.
        let views = recommended(Some((19.0760, 72.8777)), 50.0, 5, None);
        assert_eq!(views.len(), 5);
        let distances: Vec<f64> = views
            .iter()
            .map(|view| view.distance_km.expect("distance computed"))
            .collect();
        assert!(distances.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn distant_centers_fall_outside_the_radius() {
        let views = recommended(Some((19.0760, 72.8777)), 50.0, 10, None);
        assert!(views
            .iter()
            .all(|view| !view.center.name.contains("AIIMS")));
    }

    #[test]
    fn immediate_urgency_prefers_treatment_centers() {
        let views = recommended(None, 50.0, 3, Some(Urgency::Immediate));
        assert!(treats_active_tb(views[0].center.category));
    }
}
