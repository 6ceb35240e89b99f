mod remove_duplicates;

pub use remove_duplicates::RemoveDuplicates;
