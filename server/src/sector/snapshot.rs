use sectornet_shared::{
    ByteReader, ByteWrite, EntityRecord, SectorId, SectorParameters, Serde, SerdeErr,
};

/// On-disk form of a sector, written to `sectors/<id>.dat`. Records are in save state.
#[derive(Clone, Debug, PartialEq)]
pub struct SectorSnapshot {
    pub sector_id: SectorId,
    pub parameters: SectorParameters,
    pub records: Vec<EntityRecord>,
}

impl Serde for SectorSnapshot {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.sector_id.ser(writer);
        self.parameters.ser(writer);
        self.records.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            sector_id: SectorId::de(reader)?,
            parameters: SectorParameters::de(reader)?,
            records: Vec::de(reader)?,
        })
    }
}
