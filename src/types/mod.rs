mod county_id;

pub use county_id::CountyId;
