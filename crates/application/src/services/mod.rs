mod relation_matcher;

pub use relation_matcher::check_relation;
