// Conversion between the blood pressure entity and its DTO

use crate::api::blood_pressure::model::{BloodPressure, BloodPressureDto, UserRef};
use crate::utils::error_handler::FieldError;

pub fn to_dto(entity: BloodPressure) -> BloodPressureDto {
    let (user_id, user_login) = match entity.user {
        Some(user) => (Some(user.id), user.login),
        None => (None, None),
    };

    BloodPressureDto {
        id: entity.id,
        timestamp: Some(entity.timestamp),
        systolic: Some(entity.systolic),
        diastolic: Some(entity.diastolic),
        user_id,
        user_login,
    }
}

/// Checks required fields and builds the entity; `userLogin` is ignored, the owner is referenced by id
pub fn to_entity(dto: BloodPressureDto) -> Result<BloodPressure, Vec<FieldError>> {
    let mut errors: Vec<FieldError> = Vec::new();

    if dto.timestamp.is_none() {
        errors.push(FieldError { field: "timestamp", message: "must not be null" });
    }
    if dto.systolic.is_none() {
        errors.push(FieldError { field: "systolic", message: "must not be null" });
    }
    if dto.diastolic.is_none() {
        errors.push(FieldError { field: "diastolic", message: "must not be null" });
    }

    match (dto.timestamp, dto.systolic, dto.diastolic) {
        (Some(timestamp), Some(systolic), Some(diastolic)) => Ok(BloodPressure {
            id: dto.id,
            timestamp,
            systolic,
            diastolic,
            user: user_from_id(dto.user_id),
        }),
        _ => Err(errors),
    }
}

pub fn user_from_id(id: Option<i64>) -> Option<UserRef> {
    id.map(|id| UserRef { id, login: None })
}
