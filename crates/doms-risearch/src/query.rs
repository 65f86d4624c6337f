/// iTQL selecting every RadioTV file object with its state, label (the file
/// URL) and each disseminated datastream type, one row per datastream.
///
/// `order by $pid` is what makes the rows for one object adjacent; the
/// aggregator depends on it.
pub const CERTAINIZER_QUERY: &str = r#"
select $pid $state $label $datastream
from <#ri>
where
$pid <fedora-model:state> $state
and
$pid <fedora-model:label> $label
and
$pid <fedora-view:disseminates> $datastreamID
and
$pid <fedora-model:hasModel> <info:fedora/doms:ContentModel_RadioTVFile>
and
$pid <http://doms.statsbiblioteket.dk/relations/default/0/1/#isPartOfCollection> $collection
and
$datastreamID <fedora-view:disseminationType> $datastream
order by $pid
"#;
