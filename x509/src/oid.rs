//! Object identifier name registry.
//!
//! Both tables are keyed by the braced text form produced by
//! [`ObjectIdentifier::braced`], e.g. `{ 2.5.4.3 }`, and must stay sorted by
//! that key in byte order for [`resolve`] to binary search them.

use asn1::ObjectIdentifier;

pub const KEY_USAGE: &str = "{ 2.5.29.15 }";
pub const SUBJECT_ALT_NAME: &str = "{ 2.5.29.17 }";
pub const BASIC_CONSTRAINTS: &str = "{ 2.5.29.19 }";
pub const RSA_ENCRYPTION: &str = "{ 1.2.840.113549.1.1.1 }";

/// Which of the two tables a lookup consults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameStyle {
    /// `commonName`, `rsaEncryption`, ...
    #[default]
    Full,
    /// `CN`, `O`, ... (naming attributes only)
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OidEntry {
    pub dotted: &'static str,
    pub name: &'static str,
}

const fn entry(dotted: &'static str, name: &'static str) -> OidEntry {
    OidEntry { dotted, name }
}

pub const NAMES: &[OidEntry] = &[
    entry("{ 0.9.2342.19200300.100.1.1 }", "userId"),
    entry("{ 0.9.2342.19200300.100.1.25 }", "domainComponent"),
    entry("{ 1.2.840.10040.4.1 }", "id-dsa"),
    entry("{ 1.2.840.10040.4.3 }", "id-dsa-with-sha1"),
    entry("{ 1.2.840.10045.2.1 }", "id-ecPublicKey"),
    entry("{ 1.2.840.10045.3.1.7 }", "prime256v1"),
    entry("{ 1.2.840.10045.4.1 }", "ecdsa-with-SHA1"),
    entry("{ 1.2.840.10045.4.3.2 }", "ecdsa-with-SHA256"),
    entry("{ 1.2.840.10045.4.3.3 }", "ecdsa-with-SHA384"),
    entry("{ 1.2.840.10045.4.3.4 }", "ecdsa-with-SHA512"),
    entry("{ 1.2.840.10046.2.1 }", "dhpublicnumber"),
    entry("{ 1.2.840.113549.1.1.1 }", "rsaEncryption"),
    entry("{ 1.2.840.113549.1.1.10 }", "RSASSA-PSS"),
    entry("{ 1.2.840.113549.1.1.11 }", "sha256WithRSAEncryption"),
    entry("{ 1.2.840.113549.1.1.12 }", "sha384WithRSAEncryption"),
    entry("{ 1.2.840.113549.1.1.13 }", "sha512WithRSAEncryption"),
    entry("{ 1.2.840.113549.1.1.2 }", "md2WithRSAEncryption"),
    entry("{ 1.2.840.113549.1.1.3 }", "md4WithRSAEncryption"),
    entry("{ 1.2.840.113549.1.1.4 }", "md5WithRSAEncryption"),
    entry("{ 1.2.840.113549.1.1.5 }", "sha1WithRSAEncryption"),
    entry("{ 1.2.840.113549.1.1.6 }", "rsaOAEPEncryptionSET"),
    entry("{ 1.2.840.113549.1.1.7 }", "id-RSAES-OAEP"),
    entry("{ 1.2.840.113549.1.9 }", "email"),
    entry("{ 1.2.840.113549.1.9.1 }", "emailAddress"),
    entry("{ 1.2.840.113549.2.2 }", "md2"),
    entry("{ 1.2.840.113549.2.26 }", "id-sha1"),
    entry("{ 1.2.840.113549.2.5 }", "md5"),
    entry("{ 1.3.101.110 }", "X25519"),
    entry("{ 1.3.101.112 }", "Ed25519"),
    entry("{ 1.3.101.113 }", "Ed448"),
    entry("{ 1.3.132.0.34 }", "secp384r1"),
    entry("{ 1.3.132.0.35 }", "secp521r1"),
    entry("{ 1.3.14.3.2.10 }", "desMAC"),
    entry("{ 1.3.14.3.2.11 }", "rsaSignature"),
    entry("{ 1.3.14.3.2.12 }", "dsa"),
    entry("{ 1.3.14.3.2.13 }", "dsaWithSHA"),
    entry("{ 1.3.14.3.2.14 }", "mdc2WithRSASignature"),
    entry("{ 1.3.14.3.2.15 }", "shaWithRSASignature"),
    entry("{ 1.3.14.3.2.16 }", "dhWithCommonModulus"),
    entry("{ 1.3.14.3.2.17 }", "desEDE"),
    entry("{ 1.3.14.3.2.18 }", "sha"),
    entry("{ 1.3.14.3.2.19 }", "mdc-2"),
    entry("{ 1.3.14.3.2.2 }", "md4WithRSA"),
    entry("{ 1.3.14.3.2.20 }", "dsaCommon"),
    entry("{ 1.3.14.3.2.21 }", "dsaCommonWithSHA"),
    entry("{ 1.3.14.3.2.22 }", "rsaKeyTransport"),
    entry("{ 1.3.14.3.2.23 }", "keyed-hash-seal"),
    entry("{ 1.3.14.3.2.24 }", "md2WithRSASignature"),
    entry("{ 1.3.14.3.2.25 }", "md5WithRSASignature"),
    entry("{ 1.3.14.3.2.26 }", "sha-1"),
    entry("{ 1.3.14.3.2.27 }", "dsa-sha1"),
    entry("{ 1.3.14.3.2.28 }", "dsa-sha1-common-parameters"),
    entry("{ 1.3.14.3.2.29 }", "sha1-with-RSA-signature"),
    entry("{ 1.3.14.3.2.3 }", "md5WithRSA"),
    entry("{ 1.3.14.3.2.4 }", "md4WithRSAEncryption"),
    entry("{ 1.3.14.3.2.6 }", "desECB"),
    entry("{ 1.3.14.3.2.7 }", "desCBC"),
    entry("{ 1.3.14.3.2.8 }", "desOFB"),
    entry("{ 1.3.14.3.2.9 }", "desCFB"),
    entry("{ 1.3.6.1.4.1.11129.2.4.2 }", "signedCertificateTimestampList"),
    entry("{ 1.3.6.1.5.5.7.1.1 }", "authorityInfoAccess"),
    entry("{ 1.3.6.1.5.5.7.3.1 }", "serverAuth"),
    entry("{ 1.3.6.1.5.5.7.3.2 }", "clientAuth"),
    entry("{ 1.3.6.1.5.5.7.3.3 }", "codeSigning"),
    entry("{ 1.3.6.1.5.5.7.3.4 }", "emailProtection"),
    entry("{ 1.3.6.1.5.5.7.3.8 }", "timeStamping"),
    entry("{ 1.3.6.1.5.5.7.3.9 }", "OCSPSigning"),
    entry("{ 2.16.840.1.101.2.1.1.22 }", "id-keyExchangeAlgorithm"),
    entry("{ 2.16.840.1.101.3.4.2.1 }", "sha256"),
    entry("{ 2.16.840.1.101.3.4.2.2 }", "sha384"),
    entry("{ 2.16.840.1.101.3.4.2.3 }", "sha512"),
    entry("{ 2.16.840.1.113730.1.13 }", "comment"),
    entry("{ 2.5.29.1 }", "oldAuthorityKeyIdentifier"),
    entry("{ 2.5.29.14 }", "subjectKeyIdentifier"),
    entry("{ 2.5.29.15 }", "keyUsage"),
    entry("{ 2.5.29.16 }", "privateKeyUsagePeriod"),
    entry("{ 2.5.29.17 }", "subjectAltName"),
    entry("{ 2.5.29.18 }", "issuerAlternativeName"),
    entry("{ 2.5.29.19 }", "basicConstraints"),
    entry("{ 2.5.29.2 }", "oldPrimaryKeyAttributes"),
    entry("{ 2.5.29.20 }", "cRLNumber"),
    entry("{ 2.5.29.21 }", "reasonCode"),
    entry("{ 2.5.29.23 }", "holdInstructionCode"),
    entry("{ 2.5.29.24 }", "invalidityDate"),
    entry("{ 2.5.29.27 }", "deltaCRLIndicator"),
    entry("{ 2.5.29.28 }", "issuingDistributionPoint"),
    entry("{ 2.5.29.29 }", "certificateIssuer"),
    entry("{ 2.5.29.3 }", "certificatePolicies"),
    entry("{ 2.5.29.30 }", "nameConstraints"),
    entry("{ 2.5.29.31 }", "cRLDistributionPoints"),
    entry("{ 2.5.29.32 }", "certificatePolicies"),
    entry("{ 2.5.29.32.0 }", "anyPolicy"),
    entry("{ 2.5.29.33 }", "policyMappings"),
    entry("{ 2.5.29.35 }", "authorityKeyIdentifier"),
    entry("{ 2.5.29.36 }", "policyConstraints"),
    entry("{ 2.5.29.37 }", "extendedKeyUsage"),
    entry("{ 2.5.29.4 }", "primaryKeyUsageRestriction"),
    entry("{ 2.5.29.46 }", "freshestCRL"),
    entry("{ 2.5.29.54 }", "inhibitAnyPolicy"),
    entry("{ 2.5.4.0 }", "objectClass"),
    entry("{ 2.5.4.1 }", "aliasedEntryName"),
    entry("{ 2.5.4.10 }", "organizationName"),
    entry("{ 2.5.4.11 }", "organizationalUnitName"),
    entry("{ 2.5.4.11.1 }", "collectiveOrganizationalUnitName"),
    entry("{ 2.5.4.12 }", "title"),
    entry("{ 2.5.4.13 }", "description"),
    entry("{ 2.5.4.14 }", "searchGuide"),
    entry("{ 2.5.4.15 }", "businessCategory"),
    entry("{ 2.5.4.16 }", "postalAddress"),
    entry("{ 2.5.4.16.1 }", "collectivePostalAddress"),
    entry("{ 2.5.4.17 }", "postalCode"),
    entry("{ 2.5.4.17.1 }", "collectivePostalCode"),
    entry("{ 2.5.4.18 }", "postOfficeBox"),
    entry("{ 2.5.4.18.1 }", "collectivePostOfficeBox"),
    entry("{ 2.5.4.19 }", "physicalDeliveryOfficeName"),
    entry("{ 2.5.4.19.1 }", "collectivePhysicalDeliveryOfficeName"),
    entry("{ 2.5.4.2 }", "knowledgeinformation"),
    entry("{ 2.5.4.20 }", "telephoneNumber"),
    entry("{ 2.5.4.20.1 }", "collectiveTelephoneNumber"),
    entry("{ 2.5.4.21 }", "telexNumber"),
    entry("{ 2.5.4.21.1 }", "collectiveTelexNumber"),
    entry("{ 2.5.4.22 }", "telexTerminalIdentifier"),
    entry("{ 2.5.4.22.1 }", "collectiveTelexTerminalIdentifier"),
    entry("{ 2.5.4.23 }", "facsimileTelephoneNumber"),
    entry("{ 2.5.4.23.1 }", "collectiveFacsimileTelephoneNumber"),
    entry("{ 2.5.4.24 }", "x121Address"),
    entry("{ 2.5.4.25 }", "internationalISDNNumber"),
    entry("{ 2.5.4.25.1 }", "collectiveInternationalISDNNumber"),
    entry("{ 2.5.4.26 }", "registeredAddress"),
    entry("{ 2.5.4.27 }", "destinationIndicator"),
    entry("{ 2.5.4.28 }", "preferredDeliveryMethod"),
    entry("{ 2.5.4.29 }", "presentationAddress"),
    entry("{ 2.5.4.3 }", "commonName"),
    entry("{ 2.5.4.30 }", "supportedApplicationContext"),
    entry("{ 2.5.4.31 }", "member"),
    entry("{ 2.5.4.32 }", "owner"),
    entry("{ 2.5.4.33 }", "roleOccupant"),
    entry("{ 2.5.4.34 }", "seeAlso"),
    entry("{ 2.5.4.35 }", "userPassword"),
    entry("{ 2.5.4.36 }", "userCertificate"),
    entry("{ 2.5.4.37 }", "cACertificate"),
    entry("{ 2.5.4.38 }", "authorityRevocationList"),
    entry("{ 2.5.4.39 }", "certificateRevocationList"),
    entry("{ 2.5.4.4 }", "surname"),
    entry("{ 2.5.4.40 }", "crossCertificatePair"),
    entry("{ 2.5.4.41 }", "name"),
    entry("{ 2.5.4.42 }", "givenName"),
    entry("{ 2.5.4.43 }", "initials"),
    entry("{ 2.5.4.44 }", "generationQualifier"),
    entry("{ 2.5.4.45 }", "uniqueIdentifier"),
    entry("{ 2.5.4.46 }", "dnQualifier"),
    entry("{ 2.5.4.47 }", "enhancedSearchGuide"),
    entry("{ 2.5.4.48 }", "protocolInformation"),
    entry("{ 2.5.4.49 }", "distinguishedName"),
    entry("{ 2.5.4.5 }", "serialNumber"),
    entry("{ 2.5.4.50 }", "uniqueMember"),
    entry("{ 2.5.4.51 }", "houseIdentifier"),
    entry("{ 2.5.4.52 }", "supportedAlgorithms"),
    entry("{ 2.5.4.53 }", "deltaRevocationList"),
    entry("{ 2.5.4.58 }", "attributeCertificate"),
    entry("{ 2.5.4.6 }", "countryName"),
    entry("{ 2.5.4.65 }", "pseudonym"),
    entry("{ 2.5.4.7 }", "localityName"),
    entry("{ 2.5.4.7.1 }", "collectiveLocalityName"),
    entry("{ 2.5.4.8 }", "stateOrProvinceName"),
    entry("{ 2.5.4.8.1 }", "collectiveStateOrProvinceName"),
    entry("{ 2.5.4.9 }", "streetAddress"),
    entry("{ 2.5.4.9.1 }", "collectiveStreetAddress"),
];

pub const SHORT_NAMES: &[OidEntry] = &[
    entry("{ 0.9.2342.19200300.100.1.1 }", "UID"),
    entry("{ 0.9.2342.19200300.100.1.25 }", "DC"),
    entry("{ 2.5.4.10 }", "O"),
    entry("{ 2.5.4.11 }", "OU"),
    entry("{ 2.5.4.3 }", "CN"),
    entry("{ 2.5.4.4 }", "SN"),
    entry("{ 2.5.4.42 }", "GN"),
    entry("{ 2.5.4.6 }", "C"),
    entry("{ 2.5.4.7 }", "L"),
    entry("{ 2.5.4.8 }", "ST"),
];

const fn precedes(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut i = 0;
    while i < a.len() && i < b.len() {
        if a[i] != b[i] {
            return a[i] < b[i];
        }
        i += 1;
    }
    a.len() < b.len()
}

const fn is_strictly_sorted(table: &[OidEntry]) -> bool {
    let mut i = 1;
    while i < table.len() {
        if !precedes(table[i - 1].dotted, table[i].dotted) {
            return false;
        }
        i += 1;
    }
    true
}

const _: () = assert!(is_strictly_sorted(NAMES), "NAMES must be sorted by key");
const _: () = assert!(
    is_strictly_sorted(SHORT_NAMES),
    "SHORT_NAMES must be sorted by key"
);

/// Looks up a braced OID such as `{ 2.5.4.3 }`.
pub fn resolve(braced: &str, style: NameStyle) -> Option<&'static str> {
    let table = match style {
        NameStyle::Full => NAMES,
        NameStyle::Short => SHORT_NAMES,
    };
    table
        .binary_search_by(|entry| entry.dotted.cmp(braced))
        .ok()
        .map(|i| table[i].name)
}

pub fn name_of(oid: &ObjectIdentifier, style: NameStyle) -> Option<&'static str> {
    resolve(&oid.braced(), style)
}
