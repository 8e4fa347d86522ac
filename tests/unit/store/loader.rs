//! Unit tests for the CSV sheet loader and record store

use std::fs;

use funnelboard::error::DashboardError;
use funnelboard::models::{FunnelStage, Region};
use funnelboard::store::csv_loader::{
    read_developments, read_investments, read_leads, DEVELOPMENTS_FILE, INVESTMENT_FILE, LEADS_FILE,
};
use funnelboard::store::RecordStore;

use crate::fixtures::date;

const LEADS_CSV: &str = "\
ID Lead,Desarrollo,Fecha Registro,Fecha Contacto,Fecha Cita,Fecha Venta Bruta,Fecha Escrituración
L1,Altavista,2024-03-04,2024-03-06,2024-03-12,,
L2,Altavista,04/03/2024,nan,2024-03-12,,
L3,Costa Azul,2024-02-05 10:30:00,2024-02-06,2024-02-08,2024-02-09,2024-02-10
L4,Costa Azul,,2024-02-06,,,
";

const DEVELOPMENTS_CSV: &str = "\
Desarrollo,Ciudad,Región,Latitud,Longitud
Altavista,Monterrey,Norte,25.7,-100.3
Costa Azul,Mérida,sur,,
";

const INVESTMENT_CSV: &str = "\
Desarrollo,Fecha,Inversión
Altavista,2024-03-01,\"$1,000.00\"
Costa Azul,2024-02-01,400
Costa Azul,sin fecha,50
";

#[test]
fn leads_sheet_maps_accented_headers() {
    let leads = read_leads(LEADS_CSV.as_bytes()).expect("leads parse");

    assert_eq!(leads.len(), 3);
    assert_eq!(leads[0].id, "L1");
    assert_eq!(leads[0].appointment_at, Some(date(2024, 3, 12)));
    assert_eq!(leads[1].registered_at, date(2024, 3, 4));
    assert_eq!(leads[1].contacted_at, None);
    assert_eq!(leads[1].deepest_stage(), FunnelStage::Lead);
    assert_eq!(leads[2].closing_at, Some(date(2024, 2, 10)));
    assert_eq!(leads[2].deepest_stage(), FunnelStage::Escrituracion);
}

#[test]
fn developments_sheet_reads_optional_fields() {
    let developments = read_developments(DEVELOPMENTS_CSV.as_bytes()).expect("developments parse");

    assert_eq!(developments.len(), 2);
    assert_eq!(developments[0].region, Some(Region::Norte));
    assert_eq!(developments[0].latitude, Some(25.7));
    assert_eq!(developments[1].region, Some(Region::Sur));
    assert_eq!(developments[1].city, "Mérida");
    assert_eq!(developments[1].latitude, None);
}

#[test]
fn investment_rows_without_a_date_are_dropped() {
    let rows = read_investments(INVESTMENT_CSV.as_bytes()).expect("investment parse");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].amount, 1000.0);
    assert_eq!(rows[1].date, date(2024, 2, 1));
}

#[test]
fn leads_sheet_without_registration_column_fails() {
    let err = read_leads("Desarrollo,Fecha Contacto\nAltavista,2024-01-01\n".as_bytes())
        .expect_err("missing column");
    assert!(matches!(err, DashboardError::MissingColumn { sheet: "leads", .. }));
}

#[test]
fn load_dir_builds_store_with_inherited_regions() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join(LEADS_FILE), LEADS_CSV).expect("write leads");
    fs::write(dir.path().join(DEVELOPMENTS_FILE), DEVELOPMENTS_CSV).expect("write developments");
    fs::write(dir.path().join(INVESTMENT_FILE), INVESTMENT_CSV).expect("write investment");

    let store = RecordStore::load_dir(dir.path()).expect("store loads");

    assert_eq!(store.leads().len(), 3);
    assert_eq!(store.developments().len(), 2);
    assert_eq!(store.investments().len(), 2);
    assert_eq!(store.leads()[0].region, Some(Region::Norte));
    assert_eq!(store.leads()[2].region, Some(Region::Sur));
    assert_eq!(store.region_of("Costa Azul"), Some(Region::Sur));
    assert_eq!(store.max_date(), Some(date(2024, 3, 12)));
}

/// Windows-1252 bytes: `ó` is 0xF3, `ñ` is 0xF1, `é` is 0xE9.
const LATIN1_LEADS: &[u8] = b"Desarrollo,Fecha Registro,Fecha Contacto,Fecha Escrituraci\xf3n\n\
Pe\xf1asco,2024-03-04,2024-03-06,2024-03-20\n";

const LATIN1_DEVELOPMENTS: &[u8] = b"Desarrollo,Ciudad,Regi\xf3n\nPe\xf1asco,M\xe9rida,Sur\n";

#[test]
fn latin1_leads_sheet_decodes_header_and_cells() {
    let leads = read_leads(LATIN1_LEADS).expect("windows-1252 leads parse");

    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0].development, "Peñasco");
    assert_eq!(leads[0].closing_at, Some(date(2024, 3, 20)));
}

#[test]
fn load_dir_accepts_latin1_sheets() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join(LEADS_FILE), LATIN1_LEADS).expect("write leads");
    fs::write(dir.path().join(DEVELOPMENTS_FILE), LATIN1_DEVELOPMENTS).expect("write developments");
    fs::write(dir.path().join(INVESTMENT_FILE), INVESTMENT_CSV).expect("write investment");

    let store = RecordStore::load_dir(dir.path()).expect("store loads");

    assert_eq!(store.developments()[0].city, "Mérida");
    assert_eq!(store.region_of("Peñasco"), Some(Region::Sur));
    assert_eq!(store.leads()[0].region, Some(Region::Sur));
}

#[test]
fn load_dir_reports_missing_sheet() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join(INVESTMENT_FILE), INVESTMENT_CSV).expect("write investment");

    let err = RecordStore::load_dir(dir.path()).expect_err("developments sheet missing");
    match err {
        DashboardError::MissingFile(path) => assert!(path.ends_with(DEVELOPMENTS_FILE)),
        other => panic!("unexpected error: {other}"),
    }
}
