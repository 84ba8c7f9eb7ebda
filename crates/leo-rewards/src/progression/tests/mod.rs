mod chest;
mod common;
mod eligibility;
mod family;
mod legacy;
