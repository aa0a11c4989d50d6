// Blood pressure use cases: validation, mapping and storage calls

use std::sync::Arc;

use tracing::debug;

use crate::api::blood_pressure::mapper;
use crate::api::blood_pressure::model::{BloodPressure, BloodPressureDto, ENTITY_NAME};
use crate::api::blood_pressure::repository::BloodPressureRepository;
use crate::api::blood_pressure::search::SearchQuery;
use crate::utils::error_handler::{ApiError, FieldError};
use crate::utils::pagination::{Page, PageRequest};

#[derive(Debug, Clone)]
pub struct BloodPressureService {
    repository: Arc<dyn BloodPressureRepository>,
}

impl BloodPressureService {
    pub fn new(repository: Arc<dyn BloodPressureRepository>) -> Self {
        Self { repository }
    }

    /// Stores a new reading; the payload must not carry an id
    pub async fn create(&self, dto: BloodPressureDto) -> Result<BloodPressureDto, ApiError> {
        debug!("Request to create BloodPressure : {:?}", dto);
        if dto.id.is_some() {
            return Err(ApiError::bad_request_alert(
                "A new bloodPressure cannot already have an ID",
                ENTITY_NAME,
                "idexists",
            ));
        }
        let entity: BloodPressure = self.to_entity(dto).await?;
        let saved: BloodPressure = self.repository.insert(entity).await?;
        Ok(mapper::to_dto(saved))
    }

    /// Replaces an existing reading; the payload must carry the id of a stored reading
    pub async fn update(&self, dto: BloodPressureDto) -> Result<BloodPressureDto, ApiError> {
        debug!("Request to update BloodPressure : {:?}", dto);
        let Some(id) = dto.id else {
            return Err(ApiError::bad_request_alert("Invalid id", ENTITY_NAME, "idnull"));
        };
        let entity: BloodPressure = self.to_entity(dto).await?;
        let updated: BloodPressure = self
            .repository
            .update(id, entity)
            .await?
            .ok_or(ApiError::NotFound { entity_name: ENTITY_NAME, id })?;
        Ok(mapper::to_dto(updated))
    }

    /// Maps the payload and checks that its owner, if any, is a known account
    async fn to_entity(&self, dto: BloodPressureDto) -> Result<BloodPressure, ApiError> {
        let invalid = |errors: Vec<FieldError>| ApiError::Validation { entity_name: ENTITY_NAME, errors };

        let entity: BloodPressure = mapper::to_entity(dto).map_err(invalid)?;
        if let Some(user) = &entity.user {
            if self.repository.find_user(user.id).await?.is_none() {
                return Err(invalid(vec![FieldError {
                    field: "userId",
                    message: "must reference an existing user",
                }]));
            }
        }
        Ok(entity)
    }

    pub async fn find_all(&self, page: PageRequest) -> Result<Page<BloodPressureDto>, ApiError> {
        debug!("Request to get all BloodPressures, page {:?}", page);
        let page: Page<BloodPressure> = self.repository.find_all(page.clamped()).await?;
        Ok(page.map(mapper::to_dto))
    }

    pub async fn find_one(&self, id: i64) -> Result<Option<BloodPressureDto>, ApiError> {
        debug!("Request to get BloodPressure : {}", id);
        let entity: Option<BloodPressure> = self.repository.find_by_id(id).await?;
        Ok(entity.map(mapper::to_dto))
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        debug!("Request to delete BloodPressure : {}", id);
        self.repository.delete_by_id(id).await?;
        Ok(())
    }

    pub async fn search(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<Page<BloodPressureDto>, ApiError> {
        debug!("Request to search for a page of BloodPressures for query {}", query);
        let query: SearchQuery = SearchQuery::parse(query);
        let page: Page<BloodPressure> = self.repository.search(&query, page.clamped()).await?;
        Ok(page.map(mapper::to_dto))
    }
}
