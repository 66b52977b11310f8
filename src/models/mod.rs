pub mod appointment;
pub mod customer;
pub mod validation;

pub use appointment::{
    Appointment, AppointmentFields, AppointmentFilter, AppointmentInput, AppointmentStatus,
    AppointmentWithCustomer,
};
pub use customer::{Customer, CustomerFields, CustomerInput};
pub use validation::ValidationError;
