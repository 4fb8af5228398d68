mod design_chain_test;
mod support;
