use std::fmt;
use thiserror::Error;

/// Which request was missing input. Each has its own user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Reservation,
    Phone,
    Cancellation,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingField::Reservation => write!(f, "请填写完整预约信息"),
            MissingField::Phone => write!(f, "请提供手机号"),
            MissingField::Cancellation => write!(f, "参数不完整"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored dataset is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{0}")]
    MissingField(MissingField),
    #[error("场地类型不存在")]
    UnknownFacilityType,
    #[error("无效的场地编号")]
    InvalidFacilityNumber,
    #[error("时间段不存在")]
    UnknownTimeSlot,
    #[error("该场地已被预约")]
    AlreadyReserved,
    #[error("预约记录不存在")]
    NotFound,
    #[error("无效的日期")]
    InvalidDate,
    #[error("请求格式错误: {0}")]
    BadRequest(String),
    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),
}

impl BookingError {
    pub fn code(&self) -> &'static str {
        match self {
            BookingError::MissingField(_) => "missing_field",
            BookingError::UnknownFacilityType => "unknown_facility_type",
            BookingError::InvalidFacilityNumber => "invalid_facility_number",
            BookingError::UnknownTimeSlot => "unknown_time_slot",
            BookingError::AlreadyReserved => "already_reserved",
            BookingError::NotFound => "not_found",
            BookingError::InvalidDate => "invalid_date",
            BookingError::BadRequest(_) => "bad_request",
            BookingError::Storage(_) => "storage",
        }
    }
}
