use crate::domain::commands::business::{CreateBusinessCommand, UpdateBusinessCommand};
use crate::domain::models::Business as DomainBusiness;
use shared::{Business as SharedBusiness, CreateBusinessRequest, UpdateBusinessRequest};

pub struct BusinessMapper;

impl BusinessMapper {
    pub fn to_dto(domain: DomainBusiness) -> SharedBusiness {
        SharedBusiness {
            id: domain.id,
            user_id: domain.user_id,
            name: domain.name,
            license_type: domain.license_type,
            state: domain.state,
            zipcode: domain.zipcode,
            county: domain.county,
            active: domain.active,
            qris_rating: domain.qris_rating,
            accredited: domain.accredited,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }

    pub fn to_create_command(request: CreateBusinessRequest) -> CreateBusinessCommand {
        CreateBusinessCommand {
            user_id: request.user_id,
            name: request.name,
            license_type: request.license_type,
            state: request.state,
            zipcode: request.zipcode,
            county: request.county,
            qris_rating: request.qris_rating,
            accredited: request.accredited,
        }
    }

    pub fn to_update_command(request: UpdateBusinessRequest) -> UpdateBusinessCommand {
        UpdateBusinessCommand {
            name: request.name,
            license_type: request.license_type,
            zipcode: request.zipcode,
            county: request.county,
            active: request.active,
            qris_rating: request.qris_rating,
            accredited: request.accredited,
        }
    }
}
