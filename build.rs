fn main() {
    cbindgen::Builder::new()
        .with_crate(".")
        .with_include_guard("OPTIONAL_VALUE_H")
        .with_header("/* Generated from the optional_value crate. Do not edit. */".to_owned())
        .generate()
        .expect("Unable to generate bindings")
        .write_to_file("optional_value.h");
}
