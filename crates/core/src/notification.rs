//! Notification payloads and the envelope pushed to subscribers.
//!
//! Every typed publish request carries one of the payload records below.
//! The server synthesizes a Vietnamese title and message from the payload,
//! stamps it, and wraps it in an [`Envelope`] before delivery. Field names
//! are camelCase on the wire.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dates;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

/// The six kinds of event the dispatcher can publish.
/// Client-side event names the typed notifications are pushed under.
pub const EVENT_GRADE_UPDATE: &str = "ReceiveKetQuaHocTap";
pub const EVENT_MAKEUP_CLASS: &str = "ReceiveBaoBu";
pub const EVENT_CLASS_CANCELLATION: &str = "ReceiveBaoNghi";
pub const EVENT_TRAINING_SCORE: &str = "ReceiveDiemRenLuyen";
pub const EVENT_BROADCAST: &str = "Broadcast";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    GradeUpdate,
    MakeupClass,
    ClassCancellation,
    TrainingScore,
    GenericBatch,
    Broadcast,
}

impl NotificationKind {
    /// The `type` field of the envelope (and of ingress responses).
    pub fn type_tag(self) -> &'static str {
        match self {
            NotificationKind::GradeUpdate => "ket_qua_hoc_tap",
            NotificationKind::MakeupClass => "bao_bu",
            NotificationKind::ClassCancellation => "bao_nghi",
            NotificationKind::TrainingScore => "diem_ren_luyen",
            NotificationKind::GenericBatch => "batch",
            NotificationKind::Broadcast => "broadcast",
        }
    }

    /// The client-side event name the kind is pushed under.
    ///
    /// Batch deliveries use a caller-supplied name, so they have none.
    pub fn event_name(self) -> Option<&'static str> {
        match self {
            NotificationKind::GradeUpdate => Some(EVENT_GRADE_UPDATE),
            NotificationKind::MakeupClass => Some(EVENT_MAKEUP_CLASS),
            NotificationKind::ClassCancellation => Some(EVENT_CLASS_CANCELLATION),
            NotificationKind::TrainingScore => Some(EVENT_TRAINING_SCORE),
            NotificationKind::GenericBatch => None,
            NotificationKind::Broadcast => Some(EVENT_BROADCAST),
        }
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Grade update for one course section (kết quả học tập).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GradeUpdate {
    /// Course code, e.g. `IT001`.
    #[validate(length(min = 1))]
    pub ma_mon_hoc: String,
    /// Course name.
    #[validate(length(min = 1))]
    pub ten_mon_hoc: String,
    /// Course section code, e.g. `IT001.1`.
    #[validate(length(min = 1))]
    pub ma_lop_hoc_phan: String,
    /// Coursework component.
    #[validate(range(min = 0.0, max = 10.0))]
    pub diem_qua_trinh: Option<f64>,
    /// Midterm component.
    #[validate(range(min = 0.0, max = 10.0))]
    pub diem_giua_ky: Option<f64>,
    /// Final exam component.
    #[validate(range(min = 0.0, max = 10.0))]
    pub diem_cuoi_ky: Option<f64>,
    /// Overall grade.
    #[validate(range(min = 0.0, max = 10.0))]
    pub diem_tong_ket: Option<f64>,
    /// Letter grade.
    pub diem_chu: Option<String>,
    /// Semester.
    #[validate(length(min = 1))]
    pub hoc_ky: String,
    /// Academic year, e.g. `2024-2025`.
    #[validate(length(min = 1))]
    pub nam_hoc: String,
}

/// Make-up class scheduled for a section (báo bù).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MakeupClass {
    #[validate(length(min = 1))]
    pub ma_lop_hoc_phan: String,
    #[validate(length(min = 1))]
    pub ten_mon_hoc: String,
    /// Date of the make-up session.
    #[serde(with = "dates")]
    pub ngay_bu: NaiveDateTime,
    /// First period.
    #[validate(length(min = 1))]
    pub tiet_bat_dau: String,
    /// Last period.
    #[validate(length(min = 1))]
    pub tiet_ket_thuc: String,
    /// Room.
    #[validate(length(min = 1))]
    pub phong_hoc: String,
    pub ghi_chu: Option<String>,
}

/// Cancelled class session (báo nghỉ).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClassCancellation {
    #[validate(length(min = 1))]
    pub ma_lop_hoc_phan: String,
    #[validate(length(min = 1))]
    pub ten_mon_hoc: String,
    /// Date of the cancelled session.
    #[serde(with = "dates")]
    pub ngay_nghi: NaiveDateTime,
    /// Reason given by the lecturer.
    #[validate(length(min = 1))]
    pub ly_do: String,
    pub ghi_chu: Option<String>,
}

/// Training (conduct) score for a semester (điểm rèn luyện).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TrainingScore {
    #[validate(length(min = 1))]
    pub hoc_ky: String,
    #[validate(length(min = 1))]
    pub nam_hoc: String,
    #[validate(range(min = 0, max = 100))]
    pub diem_ren_luyen: i32,
    /// Classification, e.g. `Tốt`.
    #[validate(length(min = 1))]
    pub xep_loai: String,
}

// ---------------------------------------------------------------------------
// NotificationEvent
// ---------------------------------------------------------------------------

/// A typed, subscriber-addressed event.
///
/// Serializes as the bare payload; the kind travels in the envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NotificationEvent {
    GradeUpdate(GradeUpdate),
    MakeupClass(MakeupClass),
    ClassCancellation(ClassCancellation),
    TrainingScore(TrainingScore),
}

impl NotificationEvent {
    pub fn kind(&self) -> NotificationKind {
        match self {
            NotificationEvent::GradeUpdate(_) => NotificationKind::GradeUpdate,
            NotificationEvent::MakeupClass(_) => NotificationKind::MakeupClass,
            NotificationEvent::ClassCancellation(_) => NotificationKind::ClassCancellation,
            NotificationEvent::TrainingScore(_) => NotificationKind::TrainingScore,
        }
    }

    /// Event name the envelope is pushed under.
    pub fn event_name(&self) -> &'static str {
        match self {
            NotificationEvent::GradeUpdate(_) => EVENT_GRADE_UPDATE,
            NotificationEvent::MakeupClass(_) => EVENT_MAKEUP_CLASS,
            NotificationEvent::ClassCancellation(_) => EVENT_CLASS_CANCELLATION,
            NotificationEvent::TrainingScore(_) => EVENT_TRAINING_SCORE,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            NotificationEvent::GradeUpdate(_) => "Cập nhật điểm",
            NotificationEvent::MakeupClass(_) => "Thông báo học bù",
            NotificationEvent::ClassCancellation(_) => "Thông báo nghỉ học",
            NotificationEvent::TrainingScore(_) => "Cập nhật điểm rèn luyện",
        }
    }

    /// Human-readable message synthesized from the payload fields.
    pub fn message(&self) -> String {
        match self {
            NotificationEvent::GradeUpdate(p) => {
                format!("Điểm môn {} đã được cập nhật", p.ten_mon_hoc)
            }
            NotificationEvent::MakeupClass(p) => format!(
                "Lớp {} có lịch học bù vào {}",
                p.ten_mon_hoc,
                p.ngay_bu.format(dates::DISPLAY_FORMAT)
            ),
            NotificationEvent::ClassCancellation(p) => format!(
                "Lớp {} nghỉ học ngày {}",
                p.ten_mon_hoc,
                p.ngay_nghi.format(dates::DISPLAY_FORMAT)
            ),
            NotificationEvent::TrainingScore(p) => format!(
                "Điểm rèn luyện {} đã được cập nhật: {} điểm ({})",
                p.hoc_ky, p.diem_ren_luyen, p.xep_loai
            ),
        }
    }

    /// Short label for log lines (course name or semester).
    pub fn summary(&self) -> &str {
        match self {
            NotificationEvent::GradeUpdate(p) => &p.ten_mon_hoc,
            NotificationEvent::MakeupClass(p) => &p.ten_mon_hoc,
            NotificationEvent::ClassCancellation(p) => &p.ten_mon_hoc,
            NotificationEvent::TrainingScore(p) => &p.hoc_ky,
        }
    }
}

impl From<GradeUpdate> for NotificationEvent {
    fn from(payload: GradeUpdate) -> Self {
        NotificationEvent::GradeUpdate(payload)
    }
}

impl From<MakeupClass> for NotificationEvent {
    fn from(payload: MakeupClass) -> Self {
        NotificationEvent::MakeupClass(payload)
    }
}

impl From<ClassCancellation> for NotificationEvent {
    fn from(payload: ClassCancellation) -> Self {
        NotificationEvent::ClassCancellation(payload)
    }
}

impl From<TrainingScore> for NotificationEvent {
    fn from(payload: TrainingScore) -> Self {
        NotificationEvent::TrainingScore(payload)
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The `{type, title, message, data, timestamp}` wrapper applied to every
/// typed and broadcast event.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: String,
    pub message: String,
    pub data: T,
    pub timestamp: Timestamp,
}

impl Envelope<NotificationEvent> {
    pub fn for_event(event: NotificationEvent, timestamp: Timestamp) -> Self {
        Self {
            kind: event.kind().type_tag(),
            title: event.title().to_string(),
            message: event.message(),
            data: event,
            timestamp,
        }
    }
}

impl Envelope<Option<serde_json::Value>> {
    pub fn broadcast(
        title: impl Into<String>,
        message: impl Into<String>,
        data: Option<serde_json::Value>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            kind: NotificationKind::Broadcast.type_tag(),
            title: title.into(),
            message: message.into(),
            data,
            timestamp,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
