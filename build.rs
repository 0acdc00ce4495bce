//! Compiles `data/species.ron` into the library.
//!
//! The roster is parsed and validated here so a malformed data file fails the
//! build instead of the first battle. The validated catalog is written to
//! `OUT_DIR` as postcard bytes, next to a `phf` map from lowercase species
//! name to catalog index.

use schema::SpeciesCatalog;
use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;

const SPECIES_SOURCE: &str = "data/species.ron";

fn main() {
    println!("cargo:rerun-if-changed={}", SPECIES_SOURCE);
    println!("cargo:rerun-if-changed=build.rs");

    let source = fs::read_to_string(SPECIES_SOURCE)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", SPECIES_SOURCE, e));
    let catalog: SpeciesCatalog = ron::from_str(&source)
        .unwrap_or_else(|e| panic!("failed to parse {}: {}", SPECIES_SOURCE, e));

    if let Err(issue) = catalog.validate() {
        panic!("invalid species data in {}: {}", SPECIES_SOURCE, issue);
    }

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let out_path = Path::new(&out_dir);

    let bytes = catalog
        .to_bytes()
        .unwrap_or_else(|e| panic!("failed to encode species catalog: {}", e));
    fs::write(out_path.join("species.postcard"), bytes)
        .unwrap_or_else(|e| panic!("failed to write species.postcard: {}", e));

    let mut index = phf_codegen::Map::new();
    for (i, species) in catalog.species.iter().enumerate() {
        index.entry(species.name.to_lowercase(), i.to_string().as_str());
    }

    let mut generated = fs::File::create(out_path.join("generated_data.rs"))
        .unwrap_or_else(|e| panic!("failed to create generated_data.rs: {}", e));
    writeln!(
        generated,
        "static SPECIES_INDEX: phf::Map<&'static str, usize> = {};",
        index.build()
    )
    .expect("write species index");
    writeln!(
        generated,
        "static SPECIES_BYTES: &[u8] = include_bytes!(concat!(env!(\"OUT_DIR\"), \"/species.postcard\"));"
    )
    .expect("write species bytes");
}
