use std::sync::Arc;

use chrono::NaiveDate;
use ouvidoria_client::categories::CategoryInput;
use ouvidoria_client::complaints::{ComplaintUpdate, NewComplaint};
use ouvidoria_client::error::Error;
use ouvidoria_client::occurrences::{
    NewOccurrence, OccurrenceKind, OccurrenceSearch, OccurrenceUpdate, SatisfactionRating,
};
use ouvidoria_client::status::RecordStatus;
use ouvidoria_client::storage::MemoryStorage;
use ouvidoria_client::users::NewUser;
use ouvidoria_client::Ouvidoria;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> Ouvidoria {
    Ouvidoria::new(&server.uri(), Arc::new(MemoryStorage::new())).unwrap()
}

fn complaint_json(id: i64, user_id: i64) -> Value {
    json!({
        "id": id,
        "protocolo": format!("2024{id:06}"),
        "descricao": "Buraco na via",
        "data": "2024-03-05",
        "endereco": "Rua A, 10",
        "localizacao": "-3.7319,-38.5267",
        "imagem": null,
        "status": "aberta",
        "categoria_id": 3,
        "usuario_id": user_id,
        "created_at": "2024-03-05T12:00:00.000000Z",
        "updated_at": "2024-03-05T12:00:00.000000Z"
    })
}

fn occurrence_json(id: i64, user_id: i64) -> Value {
    json!({
        "id": id,
        "protocolo": format!("OC{id:05}"),
        "tipo": "sugestao",
        "setor": "Saúde",
        "data": "2024-04-01",
        "assunto": "Horário do posto",
        "detalhes": "Ampliar o horário de atendimento",
        "status": "em_andamento",
        "usuario_id": user_id,
        "satisfacao": null
    })
}

#[tokio::test]
async fn test_created_complaint_shows_up_in_user_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/reclamacoes"))
        .respond_with(ResponseTemplate::new(201).set_body_json(complaint_json(41, 1)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/usuarios/1/reclamacoes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            complaint_json(40, 1),
            complaint_json(41, 1)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let ouvidoria = client(&server);
    let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    let new = NewComplaint::new("Buraco na via", date, "Rua A, 10", 3, 1)
        .with_location(-3.7319, -38.5267);

    let created = ouvidoria.complaints().create(&new).await.unwrap();
    assert_eq!(created.protocol, "2024000041");
    assert_eq!(created.status, RecordStatus::Open);
    assert!(created.created_at.is_some());

    let mine = ouvidoria.complaints().list_by_user(1).await.unwrap();
    assert!(mine.iter().any(|c| c.id == created.id && c.protocol == created.protocol));
}

#[tokio::test]
async fn test_created_occurrence_shows_up_in_user_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ocorrencias"))
        .and(body_json(json!({
            "tipo": "sugestao",
            "setor": "Saúde",
            "data": "2024-04-01",
            "assunto": "Horário do posto",
            "detalhes": "Ampliar o horário de atendimento",
            "usuario_id": 1
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(occurrence_json(5, 1)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/usuarios/1/ocorrencias"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([occurrence_json(5, 1)])))
        .expect(1)
        .mount(&server)
        .await;

    let ouvidoria = client(&server);
    let created = ouvidoria
        .occurrences()
        .create(&NewOccurrence {
            kind: OccurrenceKind::Suggestion,
            sector: "Saúde".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            subject: "Horário do posto".to_string(),
            details: "Ampliar o horário de atendimento".to_string(),
            user_id: 1,
        })
        .await
        .unwrap();
    assert_eq!(created.protocol, "OC00005");
    assert_eq!(created.status, RecordStatus::InProgress);

    let mine = ouvidoria.occurrences().list_by_user(1).await.unwrap();
    assert_eq!(mine, vec![created]);
}

#[tokio::test]
async fn test_occurrence_update_only_sends_editable_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/ocorrencias/5"))
        .and(body_json(json!({"detalhes": "Abrir aos sábados"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(occurrence_json(5, 1)))
        .expect(1)
        .mount(&server)
        .await;

    let update = OccurrenceUpdate {
        details: Some("Abrir aos sábados".to_string()),
        ..Default::default()
    };
    let updated = client(&server)
        .occurrences()
        .update(5, &update)
        .await
        .unwrap();
    assert_eq!(updated.id, 5);
}

#[tokio::test]
async fn test_search_sends_only_set_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ocorrencias/search"))
        .and(query_param("protocolo", "OC00005"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([occurrence_json(5, 1)])))
        .expect(1)
        .mount(&server)
        .await;

    let found = client(&server)
        .occurrences()
        .search(&OccurrenceSearch::by_protocol("OC00005"))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("protocolo=OC00005"));
}

#[tokio::test]
async fn test_satisfaction_and_replies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ocorrencias/salvar_satisfacao_do_usuario"))
        .and(body_json(json!({"ocorrencia_id": 5, "satisfacao": 4})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ocorrencias/5/respostas_ocorrencia"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "ocorrencia_id": 5, "resposta": "Encaminhado ao setor", "created_at": "2024-04-02T09:30:00Z"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let ouvidoria = client(&server);
    ouvidoria
        .occurrences()
        .save_satisfaction(&SatisfactionRating::new(5, 4).unwrap())
        .await
        .unwrap();

    let replies = ouvidoria.occurrences().replies(5).await.unwrap();
    assert_eq!(replies[0].text, "Encaminhado ao setor");
    assert_eq!(replies[0].occurrence_id, 5);
}

#[tokio::test]
async fn test_out_of_range_satisfaction_is_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ocorrencias/salvar_satisfacao_do_usuario"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let rating = SatisfactionRating {
        occurrence_id: 5,
        score: 9,
    };
    let result = client(&server).occurrences().save_satisfaction(&rating).await;
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[tokio::test]
async fn test_register_validation_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/usuarios"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "The given data was invalid.",
            "errors": {
                "cpf": ["CPF inválido."],
                "email": ["E-mail já cadastrado."]
            }
        })))
        .mount(&server)
        .await;

    let new_user = NewUser {
        name: "A".to_string(),
        email: "a@b.com".to_string(),
        phone: None,
        address: None,
        neighborhood: None,
        national_id: "000.000.000-00".to_string(),
        password: "secret1".to_string(),
    };
    let err = client(&server).users().register(&new_user).await.unwrap_err();

    assert_eq!(err.status(), Some(422));
    assert_eq!(err.field_errors("cpf"), ["CPF inválido.".to_string()]);
    assert_eq!(err.field_errors("email"), ["E-mail já cadastrado.".to_string()]);
}

#[tokio::test]
async fn test_complaint_update_and_delete() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/reclamacoes/41"))
        .and(body_json(json!({"descricao": "Buraco grande"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(complaint_json(41, 1)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/reclamacoes/41"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let ouvidoria = client(&server);
    let update = ComplaintUpdate {
        description: Some("Buraco grande".to_string()),
        ..Default::default()
    };
    ouvidoria.complaints().update(41, &update).await.unwrap();
    ouvidoria.complaints().delete(41).await.unwrap();
}

#[tokio::test]
async fn test_missing_record_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/categorias/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"erro": "Categoria não encontrada"})))
        .mount(&server)
        .await;

    match client(&server).categories().get(99).await {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Categoria não encontrada");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_category_crud() {
    let server = MockServer::start().await;
    let category = json!({"id": 3, "nome": "Iluminação", "setor": "Infraestrutura"});
    Mock::given(method("POST"))
        .and(path("/categorias"))
        .and(body_json(json!({"nome": "Iluminação", "setor": "Infraestrutura"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(category.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/categorias/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(category))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/categorias/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "removida"})))
        .expect(1)
        .mount(&server)
        .await;

    let categories = client(&server).categories();
    let input = CategoryInput {
        name: "Iluminação".to_string(),
        sector: "Infraestrutura".to_string(),
    };
    let created = categories.create(&input).await.unwrap();
    assert_eq!(created.id, 3);
    assert_eq!(categories.update(3, &input).await.unwrap(), created);
    categories.delete(3).await.unwrap();
}

#[tokio::test]
async fn test_all_occurrences_tolerates_unknown_status() {
    let server = MockServer::start().await;
    let mut archived = occurrence_json(6, 2);
    archived["status"] = json!("arquivada");
    archived["tipo"] = json!("denuncia");
    archived["satisfacao"] = json!(3);
    Mock::given(method("GET"))
        .and(path("/ocorrencias/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([archived])))
        .mount(&server)
        .await;

    let all = client(&server).occurrences().all().await.unwrap();
    assert_eq!(all[0].status, RecordStatus::Unknown);
    assert_eq!(all[0].kind, OccurrenceKind::Denunciation);
    assert_eq!(all[0].satisfaction, Some(3));
}
