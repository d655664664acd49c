pub mod generator_dto;
pub mod request;
pub mod response;
