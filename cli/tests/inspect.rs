use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn testdata_path(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("x509/testdata")
        .join(name)
        .to_string_lossy()
        .to_string()
}

fn certlens() -> Command {
    Command::cargo_bin("certlens").unwrap()
}

fn inspect_json(args: &[&str]) -> serde_json::Value {
    let output = certlens()
        .arg("inspect")
        .args(args)
        .args(["-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_inspect_rsa_ca_text() {
    certlens()
        .args(["inspect", &testdata_path("rsa_ca.pem")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Certificate:"))
        .stdout(predicate::str::contains("Version: 3 (0x2)"))
        .stdout(predicate::str::contains("Serial Number: 10:01"))
        .stdout(predicate::str::contains("sha256WithRSAEncryption"))
        .stdout(predicate::str::contains("commonName=certlens-test.example (ascii)"))
        .stdout(predicate::str::contains(
            "Not Before: 1792140023 (2026-10-16T08:40:23Z)",
        ))
        .stdout(predicate::str::contains("Modulus (2048 bit)"))
        .stdout(predicate::str::contains("Exponent: 65537"))
        .stdout(predicate::str::contains("basicConstraints [2.5.29.19] (critical)"))
        .stdout(predicate::str::contains("CA:true, pathlen:1"))
        .stdout(predicate::str::contains("digitalSignature, keyCertSign, cRLSign"))
        .stdout(predicate::str::contains(
            "DNS:certlens-test.example, DNS:www.certlens-test.example",
        ));
}

#[test]
fn test_inspect_der_file() {
    certlens()
        .args(["inspect", &testdata_path("ec_leaf.der")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Serial Number: 07"))
        .stdout(predicate::str::contains("ecdsa-with-SHA256"))
        .stdout(predicate::str::contains("organizationName=Zürich Werkstatt (utf8)"))
        .stdout(predicate::str::contains("emailAddress=ops@certlens.example (ia5)"))
        .stdout(predicate::str::contains("Bit Length: 520"))
        .stdout(predicate::str::contains("digitalSignature, keyAgreement, decipherOnly"))
        .stdout(predicate::str::contains("{ 1.2.3.4 } [1.2.3.4]"));
}

#[test]
fn test_inspect_from_stdin() {
    let pem = std::fs::read(testdata_path("ec_leaf.pem")).unwrap();
    certlens()
        .args(["inspect", "--show-subject"])
        .write_stdin(pem)
        .assert()
        .success()
        .stdout(predicate::str::contains("commonName=leaf.certlens.example (utf8)"));
}

#[test]
fn test_inspect_show_subject_only() {
    certlens()
        .args(["inspect", &testdata_path("rsa_ca.pem"), "--show-subject"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Subject:"))
        .stdout(predicate::str::contains("countryName=JP (ascii)"))
        .stdout(predicate::str::contains("Issuer:").not())
        .stdout(predicate::str::contains("Serial Number").not());
}

#[test]
fn test_inspect_show_dates() {
    certlens()
        .args(["inspect", &testdata_path("ec_leaf.pem"), "--show-dates"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not After : 3520140027 (2081-07-19T08:40:27Z)"))
        .stdout(predicate::str::contains("Extensions:").not());
}

#[test]
fn test_inspect_show_issuer_and_extensions() {
    certlens()
        .args([
            "inspect",
            &testdata_path("rsa_ca.der"),
            "--show-issuer",
            "--show-extensions",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Issuer:"))
        .stdout(predicate::str::contains("subjectKeyIdentifier"))
        .stdout(predicate::str::contains("Subject Public Key Info:").not());
}

#[test]
fn test_inspect_explicit_ber() {
    certlens()
        .args([
            "inspect",
            &testdata_path("rsa_ca_indefinite.ber"),
            "--format",
            "ber",
            "--show-public-key",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("rsaEncryption"))
        .stdout(predicate::str::contains("Exponent: 65537"));
}

#[test]
fn test_inspect_json() {
    let json = inspect_json(&[&testdata_path("rsa_ca.pem")]);

    assert_eq!(2, json["version"]);
    assert_eq!("10:01", json["serialNumber"]);
    assert_eq!("sha256WithRSAEncryption", json["signatureAlgorithm"]["name"]);
    assert_eq!(
        "certlens-test.example",
        json["subject"]["commonName"]["value"]
    );
    assert_eq!("ascii", json["subject"]["commonName"]["encoding"]);
    assert_eq!(1792140023, json["validity"]["notBefore"]["epoch"]);
    assert_eq!("65537", json["publicKey"]["rsaPublicExponent"]);

    let extensions = json["extensions"].as_array().unwrap();
    let names: Vec<_> = extensions.iter().map(|e| e["name"].as_str().unwrap()).collect();
    assert_eq!(
        vec![
            "basicConstraints",
            "keyUsage",
            "subjectAltName",
            "subjectKeyIdentifier"
        ],
        names
    );
    assert_eq!(true, extensions[0]["cA"]);
    assert_eq!(1, extensions[0]["pathLenConstraint"]);
}

#[test]
fn test_inspect_json_respects_selection() {
    let json = inspect_json(&[&testdata_path("ec_leaf.pem"), "--show-public-key"]);
    let object = json.as_object().unwrap();
    assert_eq!(1, object.len());
    assert_eq!(520, json["publicKey"]["bitLength"]);
    assert!(json["publicKey"].get("rsaModulus").is_none());
}

#[test]
fn test_inspect_garbage_input_fails() {
    certlens()
        .arg("inspect")
        .write_stdin(vec![0x30, 0x82, 0x01])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DecodeFailure"));
}

#[test]
fn test_inspect_xer_is_rejected() {
    certlens()
        .args(["inspect", "--format", "xer"])
        .write_stdin("<Certificate/>")
        .assert()
        .failure();
}

#[test]
fn test_inspect_missing_file() {
    certlens()
        .args(["inspect", "no-such-file.pem"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Io("));
}

#[test]
fn test_verbose_logs_to_stderr() {
    certlens()
        .args(["-v", "inspect", &testdata_path("rsa_ca.der"), "--show-dates"])
        .assert()
        .success()
        .stderr(predicate::str::contains("installed certificate tree"))
        .stdout(predicate::str::contains("installed certificate tree").not());
}

#[test]
fn test_dump_structure() {
    certlens()
        .args(["dump", &testdata_path("rsa_ca.pem")])
        .assert()
        .success()
        .stdout(predicate::str::contains("SEQUENCE (3 elem)"))
        .stdout(predicate::str::contains("OBJECT IDENTIFIER 2.5.4.3 (commonName)"))
        .stdout(predicate::str::contains("PrintableString 'certlens-test.example'"));
}

#[test]
fn test_dump_rejects_unknown_format_value() {
    certlens()
        .args(["dump", &testdata_path("rsa_ca.der"), "--format", "json"])
        .assert()
        .failure();
}
