mod tests_expressions;
mod tests_literals;
mod tests_source;
mod tests_statements;
mod tests_structures;
