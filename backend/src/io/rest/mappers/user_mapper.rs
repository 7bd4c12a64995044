use crate::domain::models::User as DomainUser;
use shared::User as SharedUser;

pub struct UserMapper;

impl UserMapper {
    pub fn to_dto(domain: DomainUser) -> SharedUser {
        SharedUser {
            id: domain.id,
            email: domain.email,
            full_name: domain.full_name,
            greeting_name: domain.greeting_name,
            admin: domain.admin,
            active: domain.active,
            language: domain.language,
            phone_number: domain.phone_number,
            timezone: domain.timezone,
            organization: domain.organization,
        }
    }
}
