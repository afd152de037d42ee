mod tests_templates;
