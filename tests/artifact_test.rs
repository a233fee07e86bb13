use pqc_toolkit::{
    core::data::{CertificateId, SignId, TicketId},
    ArtifactSigner, Asn1DataMarshaller, Certificate, DataMarshaller, Error, HashAlgorithm, JsonDataMarshaller,
    KeyPair, Result, Sign, SignatureAlgorithm, Ticket, TicketData, UserIdTicket, UserIdType, UserInfoTicket,
};

fn ticket_id() -> TicketId {
    TicketId {
        account_id: "acc-7".into(),
        certificate_id: "cert-2".into(),
        ticket_id: "tkt-1".into(),
    }
}

fn user_info_ticket() -> Result<Ticket> {
    Ok(Ticket::new(
        ticket_id(),
        TicketData::UserInfo(UserInfoTicket::new("Ada", "Lovelace", 36)?),
    ))
}

#[test]
fn test_ticket_in_both_formats() -> Result<()> {
    let ticket = Ticket::new(
        ticket_id(),
        TicketData::UserId(UserIdTicket::new("ada@example.org", UserIdType::Email)),
    );

    let der = Asn1DataMarshaller.marshal(&ticket)?;
    assert_eq!(der[0], 0x30);
    let from_der: Ticket = Asn1DataMarshaller.demarshal(&der)?;
    assert_eq!(from_der, ticket);

    let json = JsonDataMarshaller::new().marshal(&ticket)?;
    let value: serde_json::Value = serde_json::from_slice(&json)?;
    assert_eq!(value["type"], "user_id_ticket");
    assert_eq!(value["data"]["user_id"], "ada@example.org");
    let from_json: Ticket = JsonDataMarshaller::new().demarshal(&json)?;
    assert_eq!(from_json, ticket);
    Ok(())
}

#[test]
fn test_ticket_kind_views() -> Result<()> {
    let ticket = user_info_ticket()?;
    assert!(ticket.is_user_info());
    assert!(!ticket.is_user_id());
    assert_eq!(ticket.try_user_info()?.age(), 36);

    match ticket.try_user_id() {
        Err(Error::DynamicTypeKind { expected, actual }) => {
            assert_eq!(expected, "user_id_ticket");
            assert_eq!(actual, "user_info_ticket");
        }
        other => panic!("Expected DynamicTypeKind, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_user_age_bounds() {
    assert!(matches!(UserInfoTicket::new("A", "B", 0), Err(Error::ArgumentRange(_))));
    assert!(matches!(UserInfoTicket::new("A", "B", 145), Err(Error::ArgumentRange(_))));
    assert!(UserInfoTicket::new("A", "B", 144).is_ok());
}

#[test]
fn test_json_rejects_unknown_ticket_type() {
    let json = br#"{"id":{"account_id":"a","certificate_id":"c","ticket_id":"t"},"type":"bogus","data":{}}"#;
    let result: Result<Ticket> = JsonDataMarshaller::new().demarshal(json);
    assert!(result.is_err());
}

#[test]
fn test_sign_and_verify_ticket() -> Result<()> {
    let keys = KeyPair::generate(SignatureAlgorithm::Dilithium2);
    let certificate = Certificate::new(
        CertificateId {
            account_id: "acc-7".into(),
            certificate_id: "cert-2".into(),
        },
        keys.public_key().to_vec(),
    );
    let ticket = user_info_ticket()?;

    let signer = ArtifactSigner::new(HashAlgorithm::Sha256);
    let mut sign = signer.sign(&ticket, &certificate.id.certificate_id, keys.private_key(), None)?;
    assert_eq!(sign.hash_name, "SHA256");

    // Persist the sign with an id and load it back before verifying.
    sign.id = SignId {
        account_id: "acc-7".into(),
        certificate_id: "cert-2".into(),
        ticket_id: "tkt-1".into(),
        sign_id: "sig-1".into(),
    };
    let stored = Asn1DataMarshaller.marshal(&sign)?;
    let loaded: Sign = Asn1DataMarshaller.demarshal(&stored)?;
    assert_eq!(loaded.id, sign.id);

    let verifier = ArtifactSigner::default();
    assert!(verifier.verify(&ticket, &loaded, &certificate.public_key)?);

    let altered = Ticket::new(
        ticket_id(),
        TicketData::UserInfo(UserInfoTicket::new("Ada", "Lovelace", 37)?),
    );
    assert!(!verifier.verify(&altered, &loaded, &certificate.public_key)?);
    Ok(())
}

#[test]
fn test_certificate_json_uses_base64() -> Result<()> {
    let certificate = Certificate::new(CertificateId::default(), vec![0xFF, 0x00, 0x10]);
    let json = JsonDataMarshaller::pretty().marshal(&certificate)?;
    let text = String::from_utf8(json.clone()).unwrap();
    assert!(text.contains("\"/wAQ\""));
    let back: Certificate = JsonDataMarshaller::new().demarshal(&json)?;
    assert_eq!(back, certificate);
    Ok(())
}
