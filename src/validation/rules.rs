use super::error::{RecordValidationError, ValidationErrors};
use super::traits::{is_blank, RecordValidator};
use crate::storage::models::{MissionInsert, PlanetInsert, ScientistInsert, ScientistPatch};

/// 科學家欄位驗證器
#[derive(Debug, Clone, Copy, Default)]
pub struct ScientistValidator;

impl ScientistValidator {
    const ENTITY: &'static str = "Scientist";

    fn check_name(name: &str, errors: &mut ValidationErrors) {
        if is_blank(name) {
            errors.push(RecordValidationError::missing(Self::ENTITY, "name"));
        }
    }

    fn check_field_of_study(field_of_study: &str, errors: &mut ValidationErrors) {
        if is_blank(field_of_study) {
            errors.push(RecordValidationError::missing(Self::ENTITY, "field of study"));
        }
    }
}

impl RecordValidator<ScientistInsert> for ScientistValidator {
    fn collect(&self, record: &ScientistInsert, errors: &mut ValidationErrors) {
        Self::check_name(&record.name, errors);
        Self::check_field_of_study(&record.field_of_study, errors);
    }
}

impl RecordValidator<ScientistPatch> for ScientistValidator {
    fn collect(&self, record: &ScientistPatch, errors: &mut ValidationErrors) {
        // 未提供的欄位保持原值，不做檢查
        if let Some(name) = &record.name {
            Self::check_name(name, errors);
        }
        if let Some(field_of_study) = &record.field_of_study {
            Self::check_field_of_study(field_of_study, errors);
        }
    }
}

/// 行星欄位驗證器
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanetValidator;

impl RecordValidator<PlanetInsert> for PlanetValidator {
    fn collect(&self, record: &PlanetInsert, errors: &mut ValidationErrors) {
        if is_blank(&record.name) {
            errors.push(RecordValidationError::missing("Planet", "name"));
        }
    }
}

/// 任務欄位驗證器
#[derive(Debug, Clone, Copy, Default)]
pub struct MissionValidator;

impl RecordValidator<MissionInsert> for MissionValidator {
    fn collect(&self, record: &MissionInsert, errors: &mut ValidationErrors) {
        if is_blank(&record.name) {
            errors.push(RecordValidationError::missing("Mission", "name"));
        }
        if record.scientist_id.is_none() {
            errors.push(RecordValidationError::missing("Mission", "scientist"));
        }
        if record.planet_id.is_none() {
            errors.push(RecordValidationError::missing("Mission", "planet"));
        }
    }
}
