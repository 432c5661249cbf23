pub mod activity;
pub mod city;
pub mod expense;
pub mod review;
pub mod trip;
pub mod user;
