mod tests_checks;
mod tests_editing;
mod tests_visitor;
