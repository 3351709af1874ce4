mod role_repo;
mod staff_repo;

pub use role_repo::RoleRepo;
pub use staff_repo::StaffRepo;
