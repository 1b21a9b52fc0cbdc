pub mod score_testkit;
