//! Wire types for everything leadwire speaks over HTTP.
//!
//! This crate is the single source of truth for the outbound webhook
//! payload and the collaborator API response shapes. The HTTP clients
//! deserialize into these; no other crate hand-rolls JSON.

use serde::{Deserialize, Serialize};

use leadwire_core::duration::format_duration;
use leadwire_core::{ClassifiedLead, EngagementTag};

// ─── Outbound webhook ────────────────────────────────────────────────────────

/// The JSON object posted to the CRM inbound webhook, one per lead.
///
/// Optional fields are omitted entirely when unset — the CRM treats an
/// explicit `null` differently from an absent key, so `skip_serializing_if`
/// is load-bearing here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeadPayload {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub tag: EngagementTag,
    pub purchased: u8,
    pub hot_lead: u8,
    /// Total engaged duration as `HH:MM:SS`.
    pub time_live: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webinar_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<String>,
}

impl LeadPayload {
    /// Shape a classified lead for the wire.
    pub fn from_lead(
        lead: &ClassifiedLead,
        purchased: bool,
        webinar_id: Option<&str>,
        schedule_id: Option<&str>,
    ) -> Self {
        Self {
            email: lead.email.clone(),
            first_name: lead.first_name.clone(),
            last_name: lead.last_name.clone(),
            phone: lead.phone.clone(),
            tag: lead.tag,
            purchased: purchased.into(),
            hot_lead: lead.hot_lead.into(),
            time_live: format_duration(lead.time_live_secs),
            webinar_id: webinar_id.map(str::to_string),
            schedule_id: schedule_id.map(str::to_string),
        }
    }
}

// ─── Zoom ────────────────────────────────────────────────────────────────────

/// Response from the OAuth token endpoint (account-credentials grant).
#[derive(Debug, Clone, Deserialize)]
pub struct ZoomTokenResponse {
    pub access_token: String,
    /// Lifetime in seconds from issue.
    pub expires_in: i64,
    /// Space-separated granted scopes.
    #[serde(default)]
    pub scope: String,
}

/// One participant session row. A person re-joining the room produces
/// several of these with the same `registrant_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoomParticipant {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub registrant_id: String,
    #[serde(default)]
    pub user_email: String,
    /// Seconds in the room for this session.
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub internal_user: bool,
}

/// One page of the past-webinar participants listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoomParticipantsPage {
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub participants: Vec<ZoomParticipant>,
}

/// An absentee record: a full registrant object for someone who never
/// joined. `id` here is the registrant id.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoomAbsentee {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// One page of the absentees listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoomAbsenteesPage {
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub registrants: Vec<ZoomAbsentee>,
}

// ─── WebinarJam / EverWebinar ────────────────────────────────────────────────

/// One registrant row from the WebinarJam-family registrants API.
///
/// Attendance and watch time arrive as free text (`"Yes"` / `"No"`,
/// `"H:MM:SS"`). Replay watchers carry the `attended_replay` /
/// `time_replay` pair instead of the live fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JamRegistrant {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub attended_live: Option<String>,
    #[serde(default)]
    pub time_live: Option<String>,
    #[serde(default)]
    pub purchased_live: Option<String>,
    #[serde(default)]
    pub attended_replay: Option<String>,
    #[serde(default)]
    pub time_replay: Option<String>,
}

/// The paginated inner object of a registrants response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JamRegistrantsData {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub data: Vec<JamRegistrant>,
}

/// Top-level registrants response envelope. `status` is the API's own
/// success field; HTTP 200 with `status != "success"` is still an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JamRegistrantsResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub registrants: JamRegistrantsData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadwire_core::ClassifiedLead;

    fn lead() -> ClassifiedLead {
        ClassifiedLead {
            key: "R1".to_string(),
            first_name: "Carl".to_string(),
            last_name: "Helgesson".to_string(),
            email: "carl@example.com".to_string(),
            phone: None,
            tag: EngagementTag::HighEngagement,
            hot_lead: true,
            time_live_secs: 9998,
        }
    }

    #[test]
    fn payload_omits_unset_optional_fields() {
        let payload = LeadPayload::from_lead(&lead(), false, Some("990011"), None);
        let json = serde_json::to_value(&payload).unwrap();
        let obj = json.as_object().unwrap();

        assert!(!obj.contains_key("phone"));
        assert!(!obj.contains_key("schedule_id"));
        assert_eq!(json["webinar_id"], "990011");
        assert_eq!(json["tag"], "high engagement");
        assert_eq!(json["hot_lead"], 1);
        assert_eq!(json["purchased"], 0);
        assert_eq!(json["time_live"], "02:46:38");
    }

    #[test]
    fn payload_includes_phone_when_present() {
        let mut l = lead();
        l.phone = Some("46701234567".to_string());
        let json = serde_json::to_value(LeadPayload::from_lead(&l, true, None, Some("sch_1"))).unwrap();
        assert_eq!(json["phone"], "46701234567");
        assert_eq!(json["purchased"], 1);
        assert_eq!(json["schedule_id"], "sch_1");
        assert!(!json.as_object().unwrap().contains_key("webinar_id"));
    }

    #[test]
    fn zoom_participants_page_tolerates_missing_fields() {
        let page: ZoomParticipantsPage = serde_json::from_str(
            r#"{
                "page_count": 1,
                "participants": [
                    {"name": "Peter Adehill", "duration": 4340},
                    {"registrant_id": "R2", "user_email": "m@example.com",
                     "name": "Mariana", "duration": 7867, "internal_user": false}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(page.participants.len(), 2);
        assert!(page.next_page_token.is_none());
        assert_eq!(page.participants[0].registrant_id, "");
        assert_eq!(page.participants[1].duration, 7867);
    }

    #[test]
    fn jam_response_defaults_cover_empty_envelope() {
        let resp: JamRegistrantsResponse = serde_json::from_str(r#"{"status": "error"}"#).unwrap();
        assert_eq!(resp.status, "error");
        assert!(resp.registrants.data.is_empty());
        assert_eq!(resp.registrants.current_page, 0);
    }

    #[test]
    fn jam_registrant_parses_live_and_replay_fields() {
        let r: JamRegistrant = serde_json::from_str(
            r#"{
                "first_name": "Frida", "last_name": "Wingman",
                "email": "frida@example.com", "phone_number": "+4670",
                "attended_live": "Yes", "time_live": "01:45:00",
                "purchased_live": "No",
                "attended_replay": "No", "time_replay": "00:00:00"
            }"#,
        )
        .unwrap();
        assert_eq!(r.attended_live.as_deref(), Some("Yes"));
        assert_eq!(r.time_replay.as_deref(), Some("00:00:00"));
    }
}
