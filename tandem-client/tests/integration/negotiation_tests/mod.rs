pub mod test_offer_yields_single_answer;
