pub mod complaintmodel;
pub mod housemodel;
pub mod paymentmodel;
pub mod residentmodel;
pub mod usermodel;
